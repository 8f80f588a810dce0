//! Quick-register panel: one form surface for every master entity

pub mod forms;
pub mod service;

pub use forms::{CompanyForm, RegisterForm, RegisterOutcome, SiteForm, TeamForm, WorkerForm};
pub use service::QuickRegisterService;
