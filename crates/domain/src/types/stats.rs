//! Dashboard aggregates

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Man-days and amount attributed to one site, team or company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManDayTotal {
    pub id: String,
    pub name: String,
    pub man_days: f64,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub man_days: f64,
    pub amount: i64,
    pub worker_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountByLabel {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_man_days: f64,
    pub total_amount: i64,
    pub by_site: Vec<ManDayTotal>,
    pub by_team: Vec<ManDayTotal>,
    pub by_company: Vec<ManDayTotal>,
    pub daily: Vec<DailyTotal>,
    pub workers_by_status: Vec<CountByLabel>,
    pub sites_by_status: Vec<CountByLabel>,
}
