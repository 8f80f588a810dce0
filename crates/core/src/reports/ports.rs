//! Port interfaces for daily labor reports

use async_trait::async_trait;
use chrono::NaiveDate;
use smartcon_domain::{DailyReport, Result};

#[async_trait]
pub trait DailyReportRepository: Send + Sync {
    async fn reports_for_date(&self, date: NaiveDate) -> Result<Vec<DailyReport>>;

    /// Reports with `start <= date <= end`, ordered by date.
    async fn reports_in_range(&self, start: NaiveDate, end: NaiveDate)
        -> Result<Vec<DailyReport>>;

    /// Most recent report date strictly before `date` for the team.
    async fn latest_date_before(&self, team_id: &str, date: NaiveDate)
        -> Result<Option<NaiveDate>>;

    async fn team_reports_for_date(&self, team_id: &str, date: NaiveDate)
        -> Result<Vec<DailyReport>>;

    /// Delete every report of `date` and insert `reports` in their place.
    /// Returns the number inserted.
    async fn replace_for_date(&self, date: NaiveDate, reports: &[DailyReport]) -> Result<usize>;
}
