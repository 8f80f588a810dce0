//! Payroll configuration, inputs and computed results
//!
//! Rates are percentages as entered by an administrator (`3.3` means 3.3%).
//! Computation happens in `smartcon_core::payroll::calculator`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{EntityRef, SalaryModel};
use crate::constants::{TAX_OFFICE_FILE_PREFIX, TAX_OFFICE_SHEET_TITLE};

/// A named advance-payment deduction column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionItem {
    pub key: String,
    pub label: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// One of the fixed columns that predate custom items.
    #[serde(default)]
    pub legacy: bool,
}

fn default_true() -> bool {
    true
}

impl DeductionItem {
    pub fn custom(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self { key: key.into(), label: label.into(), enabled: true, legacy: false }
    }

    fn legacy(key: &str, label: &str) -> Self {
        Self { key: key.to_string(), label: label.to_string(), enabled: true, legacy: true }
    }
}

/// Admin-editable payroll rules, stored as a single settings document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollConfig {
    /// 분리신고: report at most `split_threshold_days` per worker.
    pub split_reporting: bool,
    pub split_threshold_days: f64,
    /// 4대보험 mode.
    pub insurance_mode: bool,
    /// Reported man-days needed before insurance applies.
    pub insurance_threshold_days: f64,
    /// Combined income + resident tax rate.
    pub tax_rate: f64,
    pub pension_rate: f64,
    pub health_rate: f64,
    /// Long-term care, as a percentage of the health premium.
    pub care_rate: f64,
    pub employment_rate: f64,
    pub deduction_items: Vec<DeductionItem>,
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self {
            split_reporting: false,
            split_threshold_days: 8.0,
            insurance_mode: false,
            insurance_threshold_days: 8.0,
            tax_rate: 3.3,
            pension_rate: 4.5,
            health_rate: 3.545,
            care_rate: 12.95,
            employment_rate: 0.9,
            deduction_items: vec![
                DeductionItem::legacy("advance", "가불"),
                DeductionItem::legacy("meal", "식대"),
                DeductionItem::legacy("lodging", "숙소비"),
                DeductionItem::legacy("other", "기타"),
            ],
        }
    }
}

impl PayrollConfig {
    /// Keys of deduction items currently counted against net pay.
    pub fn active_deduction_keys(&self) -> impl Iterator<Item = &str> {
        self.deduction_items.iter().filter(|i| i.enabled).map(|i| i.key.as_str())
    }
}

/// Advance payment recorded against a worker on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceDeduction {
    pub id: String,
    pub worker_id: String,
    pub date: NaiveDate,
    /// `DeductionItem::key`
    pub item_key: String,
    pub amount: i64,
}

/// Aggregated payroll input for one worker at one unit price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollRow {
    pub worker_id: String,
    pub worker_name: String,
    pub id_number: String,
    pub salary_model: SalaryModel,
    pub man_days: f64,
    pub unit_price: i64,
    /// Deduction amounts keyed by `DeductionItem::key`.
    #[serde(default)]
    pub deductions: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub income: i64,
    pub resident: i64,
}

impl TaxBreakdown {
    pub fn total(&self) -> i64 {
        self.income.saturating_add(self.resident)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceBreakdown {
    pub pension: i64,
    pub health: i64,
    pub care: i64,
    pub employment: i64,
}

impl InsuranceBreakdown {
    pub fn total(&self) -> i64 {
        self.pension
            .saturating_add(self.health)
            .saturating_add(self.care)
            .saturating_add(self.employment)
    }
}

/// Computed payroll result for one row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollLine {
    pub worker_id: String,
    pub worker_name: String,
    pub id_number: String,
    pub salary_model: SalaryModel,
    pub unit_price: i64,
    pub total_days: f64,
    pub reported_days: f64,
    pub remaining_days: f64,
    pub gross: i64,
    pub reported_gross: i64,
    pub remaining_gross: i64,
    pub insurance_applied: bool,
    pub tax: TaxBreakdown,
    pub insurance: InsuranceBreakdown,
    pub deductions_total: i64,
    pub net_pay: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayrollTotals {
    pub man_days: f64,
    pub gross: i64,
    pub tax: i64,
    pub insurance: i64,
    pub deductions: i64,
    pub net_pay: i64,
}

impl PayrollTotals {
    pub fn from_lines(lines: &[PayrollLine]) -> Self {
        lines.iter().fold(Self::default(), |mut acc, line| {
            acc.man_days += line.total_days;
            acc.gross = acc.gross.saturating_add(line.gross);
            acc.tax = acc.tax.saturating_add(line.tax.total());
            acc.insurance = acc.insurance.saturating_add(line.insurance.total());
            acc.deductions = acc.deductions.saturating_add(line.deductions_total);
            acc.net_pay = acc.net_pay.saturating_add(line.net_pay);
            acc
        })
    }
}

/// Labor cost statement for one team over a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamLaborCostInvoice {
    pub team: EntityRef,
    pub company: Option<EntityRef>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub lines: Vec<PayrollLine>,
    pub totals: PayrollTotals,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxOfficeRow {
    /// 1-based row number.
    pub number: usize,
    pub name: String,
    pub id_number: String,
    /// 본봉: reported gross pay.
    pub base_pay: i64,
}

/// Tax office submission sheet (번호/이름/주민등록번호/본봉).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxOfficeReport {
    pub title: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub rows: Vec<TaxOfficeRow>,
    pub total_base_pay: i64,
}

impl TaxOfficeReport {
    pub fn new(start: NaiveDate, end: NaiveDate, rows: Vec<TaxOfficeRow>) -> Self {
        let total_base_pay = rows.iter().map(|r| r.base_pay).sum();
        Self { title: TAX_OFFICE_SHEET_TITLE.to_string(), start, end, rows, total_base_pay }
    }

    /// `세무서제출자료_<start>_<end>.xlsx`
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}_{}.xlsx",
            TAX_OFFICE_FILE_PREFIX,
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }

    /// Header line shown under the title.
    pub fn period_label(&self) -> String {
        format!("기간: {} ~ {}", self.start.format("%Y-%m-%d"), self.end.format("%Y-%m-%d"))
    }
}
