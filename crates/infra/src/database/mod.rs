//! SQLite document store implementing the core repository ports

pub mod documents;
pub mod invoices;
pub mod manager;
pub mod payroll;
pub mod pool;
pub mod reports;

use std::sync::Arc;

use smartcon_core::MasterRepositories;
use smartcon_domain::{Company, Site, Team, Worker};

pub use documents::SqliteDocumentRepository;
pub use invoices::SqliteInvoiceRecordRepository;
pub use manager::DbManager;
pub use payroll::{SqliteAdvanceDeductionRepository, SqlitePayrollConfigStore};
pub use reports::SqliteDailyReportRepository;

/// The four master collections over one database.
pub fn master_repositories(db: &Arc<DbManager>) -> MasterRepositories {
    MasterRepositories {
        companies: Arc::new(SqliteDocumentRepository::<Company>::new(Arc::clone(db))),
        teams: Arc::new(SqliteDocumentRepository::<Team>::new(Arc::clone(db))),
        sites: Arc::new(SqliteDocumentRepository::<Site>::new(Arc::clone(db))),
        workers: Arc::new(SqliteDocumentRepository::<Worker>::new(Arc::clone(db))),
    }
}
