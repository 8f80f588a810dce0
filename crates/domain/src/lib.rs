//! # SmartCon Domain
//!
//! Business domain types for construction workforce management.
//!
//! This crate contains:
//! - Master data entities (Company, Team, Site, Worker) and daily reports
//! - Payroll, tax-invoice and integrity-scan value types
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Pure helpers (won arithmetic, Korean name romanization)
//!
//! ## Architecture
//! - No dependencies on other SmartCon crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use utils::money::pay_for_days;
pub use utils::romanize::{company_abbreviation, romanize_name};
