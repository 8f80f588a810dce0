//! Payroll: labor cost arithmetic, settings and exports

pub mod calculator;
pub mod config_service;
pub mod ports;
pub mod service;

pub use calculator::calculate;
pub use config_service::PayrollConfigService;
pub use ports::{AdvanceDeductionRepository, PayrollConfigStore, SpreadsheetWriter};
pub use service::PayrollService;
