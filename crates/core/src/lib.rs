//! # SmartCon Core
//!
//! Business logic for construction workforce management - no
//! infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for every store and external service
//! - Master-data, quick-register and bulk-edit services
//! - The daily allocation board and report service
//! - Payroll arithmetic, settings and exports
//! - Integrity scanning, dashboard aggregates and tax invoices
//!
//! ## Architecture Principles
//! - Only depends on `smartcon-common` and `smartcon-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits

pub mod bulk_edit;
pub mod dashboard;
pub mod events;
pub mod integrity;
pub mod invoice;
pub mod master_data;
pub mod payroll;
pub mod registration;
pub mod reports;
pub mod validation;

pub use bulk_edit::{BulkEditResult, BulkEditService, BulkField, BulkWorkerEdit};
pub use dashboard::DashboardService;
pub use events::EventBus;
pub use integrity::IntegrityScanner;
pub use invoice::{InvoiceRecordRepository, TaxInvoiceGateway, TaxInvoiceService};
pub use master_data::{
    shared_cache, CacheCommand, MasterDataCache, MasterDataService, MasterRepositories,
    MasterRepository, SharedCache, WorkerRepository,
};
pub use payroll::{
    AdvanceDeductionRepository, PayrollConfigService, PayrollConfigStore, PayrollService,
    SpreadsheetWriter,
};
pub use registration::{QuickRegisterService, RegisterForm, RegisterOutcome};
pub use reports::{AllocatorBoard, DailyReportRepository, DailyReportService, DropTarget};
