//! Domain types and models
//!
//! Master entities are stored as documents and carry denormalized copies of
//! the names of the entities they reference (`EntityRef`). Nothing enforces
//! that those copies stay current; see [`integrity`] for the scan that finds
//! stale ones.

pub mod company;
pub mod events;
pub mod integrity;
pub mod invoice;
pub mod payroll;
pub mod report;
pub mod site;
pub mod stats;
pub mod team;
pub mod worker;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub use company::{Company, CompanyStatus, CompanyType};
pub use events::MasterDataChanged;
pub use integrity::{Discrepancy, FixReport, ReferenceField, ReferenceFix};
pub use invoice::{
    InvoiceLineItem, InvoiceParty, InvoiceRecord, InvoiceStatus, TaxInvoiceRequest,
    TaxInvoiceResponse,
};
pub use payroll::{
    AdvanceDeduction, DeductionItem, InsuranceBreakdown, PayrollConfig, PayrollLine, PayrollRow,
    PayrollTotals, TaxBreakdown, TaxOfficeReport, TaxOfficeRow, TeamLaborCostInvoice,
};
pub use report::{DailyReport, ReportWorkerEntry};
pub use site::{Site, SiteStatus};
pub use stats::{CountByLabel, DailyTotal, DashboardSummary, ManDayTotal};
pub use team::{Team, TeamStatus, TeamType};
pub use worker::{SalaryModel, Worker, WorkerPatch, WorkerStatus};

/// Denormalized reference: the id of a master document plus a copy of its
/// name taken at write time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: String,
    pub name: String,
}

impl EntityRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

/// Bank account fields shared by companies and workers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub account_holder: Option<String>,
}

/// A master document kept in its own collection.
pub trait MasterRecord: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection the document lives in.
    const COLLECTION: &'static str;

    /// Document id.
    fn id(&self) -> &str;

    /// Current display name, which other documents copy.
    fn name(&self) -> &str;

    /// Stamp `updated_at`.
    fn touch(&mut self, now: i64);

    /// Assign an id when missing and stamp both timestamps.
    fn initialize(&mut self, now: i64);

    /// Reference to this document with its current name.
    fn to_ref(&self) -> EntityRef {
        EntityRef::new(self.id(), self.name())
    }
}

/// Generate a new time-ordered document id.
pub fn new_document_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// Current Unix timestamp in seconds.
pub fn now_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}
