//! In-memory implementations of the core ports
//!
//! Every store keeps its documents behind a `parking_lot::Mutex` and can be
//! told to fail writes, so services can be driven through their rollback
//! paths without a database.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;
use smartcon_core::{
    AdvanceDeductionRepository, DailyReportRepository, InvoiceRecordRepository, MasterRepository,
    PayrollConfigStore, SpreadsheetWriter, TaxInvoiceGateway, WorkerRepository,
};
use smartcon_domain::{
    AdvanceDeduction, DailyReport, InvoiceRecord, MasterRecord, PayrollConfig, ReferenceField,
    ReferenceFix, Result, SmartconError, TaxInvoiceRequest, TaxInvoiceResponse, TaxOfficeReport,
    Worker, WorkerPatch,
};

fn write_failure() -> SmartconError {
    SmartconError::Database("injected write failure".into())
}

/// One master collection.
pub struct MemoryCollection<T> {
    docs: Mutex<BTreeMap<String, T>>,
    fail_writes: AtomicBool,
    batch_calls: AtomicUsize,
}

impl<T: MasterRecord> MemoryCollection<T> {
    pub fn new() -> Self {
        Self {
            docs: Mutex::new(BTreeMap::new()),
            fail_writes: AtomicBool::new(false),
            batch_calls: AtomicUsize::new(0),
        }
    }

    pub fn seed(&self, records: impl IntoIterator<Item = T>) {
        let mut docs = self.docs.lock();
        for record in records {
            docs.insert(record.id().to_string(), record);
        }
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn snapshot(&self, id: &str) -> Option<T> {
        self.docs.lock().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.docs.lock().len()
    }

    /// Number of batch writes received.
    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(write_failure());
        }
        Ok(())
    }
}

#[async_trait]
impl<T: MasterRecord> MasterRepository<T> for MemoryCollection<T> {
    async fn list(&self) -> Result<Vec<T>> {
        let mut records: Vec<T> = self.docs.lock().values().cloned().collect();
        records.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(records)
    }

    async fn get(&self, id: &str) -> Result<Option<T>> {
        Ok(self.snapshot(id))
    }

    async fn create(&self, record: &T) -> Result<()> {
        self.check_writable()?;
        let mut docs = self.docs.lock();
        if docs.contains_key(record.id()) {
            return Err(SmartconError::Conflict(record.id().to_string()));
        }
        docs.insert(record.id().to_string(), record.clone());
        Ok(())
    }

    async fn update(&self, record: &T) -> Result<()> {
        self.check_writable()?;
        let mut docs = self.docs.lock();
        match docs.get_mut(record.id()) {
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(SmartconError::not_found(T::COLLECTION, record.id())),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        self.check_writable()?;
        Ok(self.docs.lock().remove(id).is_some())
    }
}

#[async_trait]
impl WorkerRepository for MemoryCollection<Worker> {
    async fn update_many(&self, ids: &[String], patch: &WorkerPatch) -> Result<usize> {
        self.check_writable()?;
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        let mut docs = self.docs.lock();
        let mut updated = 0;
        for id in ids {
            if let Some(worker) = docs.get_mut(id) {
                worker.apply_patch(patch);
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn set_reference_names(&self, fixes: &[ReferenceFix]) -> Result<usize> {
        self.check_writable()?;
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        let mut docs = self.docs.lock();
        let mut applied = 0;
        for fix in fixes {
            let Some(worker) = docs.get_mut(&fix.worker_id) else { continue };
            let reference = match fix.field {
                ReferenceField::Team => worker.team.as_mut(),
                ReferenceField::Site => worker.site.as_mut(),
                ReferenceField::Company => worker.company.as_mut(),
            };
            if let Some(reference) = reference.filter(|r| r.id == fix.referenced_id) {
                reference.name = fix.name.clone();
                applied += 1;
            }
        }
        Ok(applied)
    }
}

#[derive(Default)]
pub struct MemoryReportRepository {
    reports: Mutex<Vec<DailyReport>>,
}

impl MemoryReportRepository {
    pub fn seed(&self, reports: impl IntoIterator<Item = DailyReport>) {
        self.reports.lock().extend(reports);
    }

    pub fn all(&self) -> Vec<DailyReport> {
        self.reports.lock().clone()
    }
}

#[async_trait]
impl DailyReportRepository for MemoryReportRepository {
    async fn reports_for_date(&self, date: NaiveDate) -> Result<Vec<DailyReport>> {
        Ok(self.reports.lock().iter().filter(|r| r.date == date).cloned().collect())
    }

    async fn reports_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyReport>> {
        let mut found: Vec<DailyReport> = self
            .reports
            .lock()
            .iter()
            .filter(|r| r.date >= start && r.date <= end)
            .cloned()
            .collect();
        found.sort_by_key(|r| r.date);
        Ok(found)
    }

    async fn latest_date_before(
        &self,
        team_id: &str,
        date: NaiveDate,
    ) -> Result<Option<NaiveDate>> {
        Ok(self
            .reports
            .lock()
            .iter()
            .filter(|r| r.team.id == team_id && r.date < date)
            .map(|r| r.date)
            .max())
    }

    async fn team_reports_for_date(
        &self,
        team_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<DailyReport>> {
        Ok(self
            .reports
            .lock()
            .iter()
            .filter(|r| r.team.id == team_id && r.date == date)
            .cloned()
            .collect())
    }

    async fn replace_for_date(&self, date: NaiveDate, reports: &[DailyReport]) -> Result<usize> {
        let mut stored = self.reports.lock();
        stored.retain(|r| r.date != date);
        stored.extend(reports.iter().cloned());
        Ok(reports.len())
    }
}

/// Settings store that can silently drop writes, like a backend whose access
/// rules reject the update without an error.
#[derive(Default)]
pub struct MemoryConfigStore {
    stored: Mutex<Option<PayrollConfig>>,
    drop_writes: AtomicBool,
}

impl MemoryConfigStore {
    pub fn drop_writes(&self, enabled: bool) {
        self.drop_writes.store(enabled, Ordering::SeqCst);
    }

    pub fn stored(&self) -> Option<PayrollConfig> {
        self.stored.lock().clone()
    }
}

#[async_trait]
impl PayrollConfigStore for MemoryConfigStore {
    async fn load(&self) -> Result<Option<PayrollConfig>> {
        Ok(self.stored())
    }

    async fn save(&self, config: &PayrollConfig) -> Result<()> {
        if !self.drop_writes.load(Ordering::SeqCst) {
            *self.stored.lock() = Some(config.clone());
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryDeductionRepository {
    deductions: Mutex<Vec<AdvanceDeduction>>,
}

#[async_trait]
impl AdvanceDeductionRepository for MemoryDeductionRepository {
    async fn in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<AdvanceDeduction>> {
        Ok(self
            .deductions
            .lock()
            .iter()
            .filter(|d| d.date >= start && d.date <= end)
            .cloned()
            .collect())
    }

    async fn save(&self, deduction: &AdvanceDeduction) -> Result<()> {
        let mut deductions = self.deductions.lock();
        deductions.retain(|d| d.id != deduction.id);
        deductions.push(deduction.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut deductions = self.deductions.lock();
        let before = deductions.len();
        deductions.retain(|d| d.id != id);
        Ok(deductions.len() != before)
    }
}

/// Records the reports it was asked to write instead of touching disk.
#[derive(Default)]
pub struct RecordingWriter {
    written: Mutex<Vec<(PathBuf, TaxOfficeReport)>>,
}

impl RecordingWriter {
    pub fn written(&self) -> Vec<(PathBuf, TaxOfficeReport)> {
        self.written.lock().clone()
    }
}

impl SpreadsheetWriter for RecordingWriter {
    fn write_tax_office_report(&self, report: &TaxOfficeReport, path: &Path) -> Result<()> {
        self.written.lock().push((path.to_path_buf(), report.clone()));
        Ok(())
    }
}

/// Gateway that answers every request with a fixed response.
pub struct StubGateway {
    response: TaxInvoiceResponse,
    requests: Mutex<Vec<TaxInvoiceRequest>>,
}

impl StubGateway {
    pub fn approving(number: &str) -> Self {
        Self::answering(TaxInvoiceResponse {
            success: true,
            approval_number: Some(number.to_string()),
            message: None,
        })
    }

    pub fn answering(response: TaxInvoiceResponse) -> Self {
        Self { response, requests: Mutex::new(Vec::new()) }
    }

    pub fn requests(&self) -> Vec<TaxInvoiceRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl TaxInvoiceGateway for StubGateway {
    async fn issue(&self, request: &TaxInvoiceRequest) -> Result<TaxInvoiceResponse> {
        self.requests.lock().push(request.clone());
        Ok(self.response.clone())
    }
}

#[derive(Default)]
pub struct MemoryInvoiceRepository {
    records: Mutex<Vec<InvoiceRecord>>,
}

#[async_trait]
impl InvoiceRecordRepository for MemoryInvoiceRepository {
    async fn save(&self, record: &InvoiceRecord) -> Result<()> {
        self.records.lock().push(record.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<InvoiceRecord>> {
        let mut records = self.records.lock().clone();
        records.sort_by(|a, b| b.issued_at.cmp(&a.issued_at));
        Ok(records)
    }
}
