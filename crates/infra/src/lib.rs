//! # SmartCon Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite document store (r2d2 pool) for master data, reports, payroll
//!   settings, advance deductions and issued invoices
//! - Configuration loading (environment, JSON/TOML files)
//! - HTTP client with retry and the tax-invoice API client
//! - XLSX export of the tax office sheet
//! - Background integrity reconciliation
//!
//! ## Architecture
//! - Implements traits defined in `smartcon-core`
//! - Contains all "impure" code (I/O, network, files)

pub mod config;
pub mod database;
pub mod errors;
pub mod export;
pub mod http;
pub mod integrations;
pub mod scheduling;

// Re-export commonly used items
pub use database::{
    master_repositories, DbManager, SqliteAdvanceDeductionRepository, SqliteDailyReportRepository,
    SqliteDocumentRepository, SqliteInvoiceRecordRepository, SqlitePayrollConfigStore,
};
pub use errors::InfraError;
pub use export::XlsxSpreadsheetWriter;
pub use http::HttpClient;
pub use integrations::{DisabledInvoiceGateway, InvoiceApiClient};
pub use scheduling::{IntegrityReconciler, ReconcilerConfig};
