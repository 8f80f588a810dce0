//! Labor cost statements, tax office sheets and advance deductions

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use smartcon_common::Validator;
use smartcon_domain::{
    new_document_id, AdvanceDeduction, DailyReport, EntityRef, PayrollRow, PayrollTotals, Result,
    SmartconError, TaxOfficeReport, TaxOfficeRow, TeamLaborCostInvoice, Worker,
};
use tracing::{debug, error, info};

use super::calculator::calculate;
use super::config_service::PayrollConfigService;
use super::ports::{AdvanceDeductionRepository, SpreadsheetWriter};
use crate::master_data::service::require;
use crate::master_data::MasterRepositories;
use crate::reports::DailyReportRepository;
use crate::validation::validation_failed;

pub struct PayrollService {
    repos: MasterRepositories,
    reports: Arc<dyn DailyReportRepository>,
    deductions: Arc<dyn AdvanceDeductionRepository>,
    config: Arc<PayrollConfigService>,
    writer: Arc<dyn SpreadsheetWriter>,
    export_dir: PathBuf,
}

impl PayrollService {
    pub fn new(
        repos: MasterRepositories,
        reports: Arc<dyn DailyReportRepository>,
        deductions: Arc<dyn AdvanceDeductionRepository>,
        config: Arc<PayrollConfigService>,
        writer: Arc<dyn SpreadsheetWriter>,
        export_dir: impl Into<PathBuf>,
    ) -> Self {
        Self { repos, reports, deductions, config, writer, export_dir: export_dir.into() }
    }

    /// Labor cost statement for one team over `start..=end`.
    pub async fn team_invoice(
        &self,
        team_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TeamLaborCostInvoice> {
        check_period(start, end)?;
        let team = require(self.repos.teams.as_ref(), team_id).await?;
        let config = self.config.load().await?;

        let reports: Vec<DailyReport> = self
            .reports
            .reports_in_range(start, end)
            .await?
            .into_iter()
            .filter(|r| r.team.id == team_id)
            .collect();
        let rows = self.payroll_rows(&reports, start, end).await?;
        let lines = rows.iter().map(|row| calculate(row, &config)).collect::<Result<Vec<_>>>()?;
        let totals = PayrollTotals::from_lines(&lines);

        debug!(
            %team_id,
            %start,
            %end,
            lines = lines.len(),
            gross = totals.gross,
            "team invoice built"
        );
        Ok(TeamLaborCostInvoice {
            team: EntityRef::new(team.id, team.name),
            company: team.company,
            start,
            end,
            lines,
            totals,
        })
    }

    /// 본봉 per worker across every team: the reported gross pay summed over
    /// the period.
    pub async fn tax_office_report(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TaxOfficeReport> {
        check_period(start, end)?;
        let config = self.config.load().await?;
        let reports = self.reports.reports_in_range(start, end).await?;
        let rows = self.payroll_rows(&reports, start, end).await?;

        let mut per_worker: BTreeMap<(String, String), (String, i64)> = BTreeMap::new();
        for row in &rows {
            let line = calculate(row, &config)?;
            let entry = per_worker
                .entry((row.worker_name.clone(), row.worker_id.clone()))
                .or_insert_with(|| (row.id_number.clone(), 0));
            entry.1 = entry.1.saturating_add(line.reported_gross);
        }

        let rows = per_worker
            .into_iter()
            .enumerate()
            .map(|(index, ((name, _), (id_number, base_pay)))| TaxOfficeRow {
                number: index + 1,
                name,
                id_number,
                base_pay,
            })
            .collect();
        Ok(TaxOfficeReport::new(start, end, rows))
    }

    /// Build the tax office sheet and write it under the export directory.
    pub async fn export_tax_office_report(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PathBuf> {
        let report = self.tax_office_report(start, end).await?;
        let path = self.export_dir.join(report.file_name());

        let writer = Arc::clone(&self.writer);
        let target = path.clone();
        let rows = report.rows.len();
        tokio::task::spawn_blocking(move || writer.write_tax_office_report(&report, &target))
            .await
            .map_err(|e| {
                error!(error = %e, "spreadsheet export task failed");
                SmartconError::Internal(format!("export task failed: {e}"))
            })??;

        info!(path = %path.display(), rows, "tax office report exported");
        Ok(path)
    }

    pub async fn list_deductions(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AdvanceDeduction>> {
        check_period(start, end)?;
        self.deductions.in_range(start, end).await
    }

    /// Record an advance payment against a configured deduction item.
    pub async fn record_deduction(
        &self,
        mut deduction: AdvanceDeduction,
    ) -> Result<AdvanceDeduction> {
        let config = self.config.current();
        let known = config.deduction_items.iter().any(|i| i.key == deduction.item_key);
        let mut v = Validator::new().stop_on_first_error();
        v.require("worker_id", &deduction.worker_id, "작업자를 선택해주세요")
            .ensure("item_key", known, "공제 항목을 선택해주세요")
            .ensure("amount", deduction.amount > 0, "금액은 0보다 커야 합니다");
        v.finalize().map_err(validation_failed)?;

        self.repos
            .workers
            .get(&deduction.worker_id)
            .await?
            .ok_or_else(|| SmartconError::not_found("workers", &deduction.worker_id))?;

        if deduction.id.trim().is_empty() {
            deduction.id = new_document_id();
        }
        self.deductions.save(&deduction).await?;
        info!(
            deduction_id = %deduction.id,
            worker_id = %deduction.worker_id,
            item = %deduction.item_key,
            "advance deduction recorded"
        );
        Ok(deduction)
    }

    pub async fn delete_deduction(&self, id: &str) -> Result<()> {
        if !self.deductions.delete(id).await? {
            return Err(SmartconError::not_found("advanceDeductions", id));
        }
        Ok(())
    }

    async fn payroll_rows(
        &self,
        reports: &[DailyReport],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PayrollRow>> {
        let workers: HashMap<String, Worker> =
            self.repos.workers.list().await?.into_iter().map(|w| (w.id.clone(), w)).collect();
        let deductions = self.deductions.in_range(start, end).await?;
        Ok(aggregate_rows(reports, &workers, &deductions))
    }
}

fn check_period(start: NaiveDate, end: NaiveDate) -> Result<()> {
    let mut v = Validator::new();
    v.ensure("end", end >= start, "종료일은 시작일 이후여야 합니다");
    v.finalize().map_err(validation_failed)
}

/// One row per (worker, unit price), ordered by worker name then price.
/// A worker's deductions land on their first row so they are counted once.
pub fn aggregate_rows(
    reports: &[DailyReport],
    workers: &HashMap<String, Worker>,
    deductions: &[AdvanceDeduction],
) -> Vec<PayrollRow> {
    let mut rows: BTreeMap<(String, i64), PayrollRow> = BTreeMap::new();
    for entry in reports.iter().flat_map(|r| r.workers.iter()) {
        let row = rows.entry((entry.worker_id.clone(), entry.unit_price)).or_insert_with(|| {
            let master = workers.get(&entry.worker_id);
            PayrollRow {
                worker_id: entry.worker_id.clone(),
                worker_name: master.map_or_else(|| entry.name.clone(), |w| w.name.clone()),
                id_number: master.map(|w| w.id_number.clone()).unwrap_or_default(),
                salary_model: entry.salary_model,
                man_days: 0.0,
                unit_price: entry.unit_price,
                deductions: BTreeMap::new(),
            }
        });
        row.man_days += entry.man_day;
    }

    let mut rows: Vec<PayrollRow> = rows.into_values().collect();
    rows.sort_by(|a, b| {
        a.worker_name
            .cmp(&b.worker_name)
            .then_with(|| a.worker_id.cmp(&b.worker_id))
            .then_with(|| a.unit_price.cmp(&b.unit_price))
    });

    for deduction in deductions {
        if let Some(row) = rows.iter_mut().find(|r| r.worker_id == deduction.worker_id) {
            let total = row.deductions.entry(deduction.item_key.clone()).or_insert(0);
            *total = total.saturating_add(deduction.amount);
        }
    }
    rows
}
