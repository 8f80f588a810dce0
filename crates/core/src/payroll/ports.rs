//! Port interfaces for payroll

use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveDate;
use smartcon_domain::{AdvanceDeduction, PayrollConfig, Result, TaxOfficeReport};

/// Shared payroll settings document.
#[async_trait]
pub trait PayrollConfigStore: Send + Sync {
    /// `None` when the document has never been written.
    async fn load(&self) -> Result<Option<PayrollConfig>>;

    async fn save(&self, config: &PayrollConfig) -> Result<()>;
}

#[async_trait]
pub trait AdvanceDeductionRepository: Send + Sync {
    /// Deductions with `start <= date <= end`.
    async fn in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<AdvanceDeduction>>;

    async fn save(&self, deduction: &AdvanceDeduction) -> Result<()>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: &str) -> Result<bool>;
}

/// Renders the tax office sheet to a workbook file.
pub trait SpreadsheetWriter: Send + Sync {
    fn write_tax_office_report(&self, report: &TaxOfficeReport, path: &Path) -> Result<()>;
}
