//! Daily labor reports

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{EntityRef, SalaryModel};
use crate::errors::{Result, SmartconError};
use crate::utils::money::pay_for_days;

/// One worker's line on a daily report. Price and salary model are
/// snapshotted so later master edits don't rewrite history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportWorkerEntry {
    pub worker_id: String,
    pub name: String,
    pub man_day: f64,
    pub unit_price: i64,
    pub salary_model: SalaryModel,
}

impl ReportWorkerEntry {
    /// man-days × unit price, floored to whole won. `None` on overflow.
    pub fn amount(&self) -> Option<i64> {
        pay_for_days(self.man_day, self.unit_price)
    }
}

/// Daily labor report for one (site, team) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReport {
    pub id: String,
    pub date: NaiveDate,
    pub team: EntityRef,
    pub site: EntityRef,
    pub workers: Vec<ReportWorkerEntry>,
    pub total_man_day: f64,
    pub total_amount: i64,
    #[serde(default)]
    pub work_content: Option<String>,
    #[serde(default)]
    pub weather: Option<String>,
}

impl DailyReport {
    /// Build a report and derive its totals from `workers`.
    ///
    /// Fails with `InvalidInput` when an entry's amount or the total does
    /// not fit in whole won.
    pub fn new(
        id: String,
        date: NaiveDate,
        team: EntityRef,
        site: EntityRef,
        workers: Vec<ReportWorkerEntry>,
    ) -> Result<Self> {
        let mut report = Self {
            id,
            date,
            team,
            site,
            workers,
            total_man_day: 0.0,
            total_amount: 0,
            work_content: None,
            weather: None,
        };
        report.recompute_totals()?;
        Ok(report)
    }

    pub fn recompute_totals(&mut self) -> Result<()> {
        let mut total = 0_i64;
        for worker in &self.workers {
            total = worker
                .amount()
                .and_then(|amount| total.checked_add(amount))
                .ok_or_else(|| {
                    SmartconError::InvalidInput(format!(
                        "{}: 금액이 허용 범위를 벗어났습니다",
                        worker.name
                    ))
                })?;
        }
        self.total_man_day = self.workers.iter().map(|w| w.man_day).sum();
        self.total_amount = total;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, man_day: f64, unit_price: i64) -> ReportWorkerEntry {
        ReportWorkerEntry {
            worker_id: id.into(),
            name: id.into(),
            man_day,
            unit_price,
            salary_model: SalaryModel::Daily,
        }
    }

    #[test]
    fn test_totals_derived_from_entries() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let report = DailyReport::new(
            "r1".into(),
            date,
            EntityRef::new("t1", "팀"),
            EntityRef::new("s1", "현장"),
            vec![entry("a", 1.0, 150_000), entry("b", 0.5, 130_000)],
        )
        .unwrap();
        assert!((report.total_man_day - 1.5).abs() < f64::EPSILON);
        assert_eq!(report.total_amount, 215_000);
    }

    #[test]
    fn test_fractional_amount_is_floored() {
        assert_eq!(entry("a", 0.5, 100_001).amount(), Some(50_000));
    }

    #[test]
    fn test_overflowing_amount_is_rejected() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let err = DailyReport::new(
            "r1".into(),
            date,
            EntityRef::new("t1", "팀"),
            EntityRef::new("s1", "현장"),
            vec![entry("a", 1.0, 150_000), entry("b", 3.0, i64::MAX / 2)],
        )
        .unwrap_err();
        assert!(matches!(err, SmartconError::InvalidInput(ref msg) if msg.starts_with("b:")));
    }
}
