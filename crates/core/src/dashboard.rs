//! Aggregates for the dashboard charts

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Display;
use std::sync::Arc;

use chrono::NaiveDate;
use smartcon_domain::{
    now_timestamp, CountByLabel, DailyReport, DailyTotal, DashboardSummary, EntityRef,
    ManDayTotal, MasterDataChanged, MasterRecord, Result, SiteStatus, WorkerStatus,
};
use tracing::{debug, info};

use crate::events::EventBus;
use crate::master_data::{run_optimistic, CacheCommand, MasterRepositories, SharedCache};
use crate::reports::DailyReportRepository;

pub struct DashboardService {
    repos: MasterRepositories,
    reports: Arc<dyn DailyReportRepository>,
    cache: SharedCache,
    events: EventBus,
}

impl DashboardService {
    pub fn new(
        repos: MasterRepositories,
        reports: Arc<dyn DailyReportRepository>,
        cache: SharedCache,
        events: EventBus,
    ) -> Self {
        Self { repos, reports, cache, events }
    }

    pub async fn summary(&self, start: NaiveDate, end: NaiveDate) -> Result<DashboardSummary> {
        let reports = self.reports.reports_in_range(start, end).await?;
        let team_companies = self.team_companies().await?;
        let workers = self.repos.workers.list().await?;
        let sites = self.repos.sites.list().await?;

        let mut by_site = Totals::default();
        let mut by_team = Totals::default();
        let mut by_company = Totals::default();
        for report in &reports {
            by_site.add(&report.site, report);
            by_team.add(&report.team, report);
            if let Some(company) = team_companies.get(&report.team.id) {
                by_company.add(company, report);
            }
        }

        let workers_by_status = count_labels(WorkerStatus::ALL, workers.iter().map(|w| w.status));
        let sites_by_status = count_labels(SiteStatus::ALL, sites.iter().map(|s| s.status));

        debug!(%start, %end, reports = reports.len(), "dashboard summary computed");
        Ok(DashboardSummary {
            start,
            end,
            total_man_days: reports.iter().map(|r| r.total_man_day).sum(),
            total_amount: reports.iter().map(|r| r.total_amount).sum(),
            by_site: by_site.into_sorted(),
            by_team: by_team.into_sorted(),
            by_company: by_company.into_sorted(),
            daily: daily_totals(&reports),
            workers_by_status,
            sites_by_status,
        })
    }

    /// Recompute every company's `total_man_day` from all saved reports.
    /// Returns the number of companies whose total changed.
    pub async fn refresh_company_totals(&self) -> Result<usize> {
        let from = NaiveDate::default();
        let to = NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX);
        let reports = self.reports.reports_in_range(from, to).await?;
        let team_companies = self.team_companies().await?;

        let mut totals: HashMap<String, f64> = HashMap::new();
        for report in &reports {
            if let Some(company) = team_companies.get(&report.team.id) {
                *totals.entry(company.id.clone()).or_default() += report.total_man_day;
            }
        }

        let mut changed = 0;
        for mut company in self.repos.companies.list().await? {
            let total = totals.get(&company.id).copied().unwrap_or_default();
            if (company.total_man_day - total).abs() < 1e-9 {
                continue;
            }
            company.total_man_day = total;
            company.touch(now_timestamp());

            let repo = Arc::clone(&self.repos.companies);
            let record = company.clone();
            run_optimistic(&self.cache, CacheCommand::UpsertCompany(company), async move {
                repo.update(&record).await
            })
            .await?;
            changed += 1;
        }

        if changed > 0 {
            self.events.publish(MasterDataChanged::companies());
        }
        info!(companies = changed, reports = reports.len(), "company man-day totals refreshed");
        Ok(changed)
    }

    async fn team_companies(&self) -> Result<HashMap<String, EntityRef>> {
        Ok(self
            .repos
            .teams
            .list()
            .await?
            .into_iter()
            .filter_map(|team| team.company.map(|company| (team.id, company)))
            .collect())
    }
}

#[derive(Default)]
struct Totals(BTreeMap<String, ManDayTotal>);

impl Totals {
    fn add(&mut self, key: &EntityRef, report: &DailyReport) {
        let total = self.0.entry(key.id.clone()).or_insert_with(|| ManDayTotal {
            id: key.id.clone(),
            name: key.name.clone(),
            man_days: 0.0,
            amount: 0,
        });
        total.man_days += report.total_man_day;
        total.amount += report.total_amount;
    }

    /// Largest man-day totals first.
    fn into_sorted(self) -> Vec<ManDayTotal> {
        let mut totals: Vec<_> = self.0.into_values().collect();
        totals.sort_by(|a, b| {
            b.man_days.total_cmp(&a.man_days).then_with(|| a.name.cmp(&b.name))
        });
        totals
    }
}

fn daily_totals(reports: &[DailyReport]) -> Vec<DailyTotal> {
    let mut days: BTreeMap<NaiveDate, (f64, i64, BTreeSet<&str>)> = BTreeMap::new();
    for report in reports {
        let day = days.entry(report.date).or_default();
        day.0 += report.total_man_day;
        day.1 = day.1.saturating_add(report.total_amount);
        day.2.extend(report.workers.iter().map(|w| w.worker_id.as_str()));
    }
    days.into_iter()
        .map(|(date, (man_days, amount, workers))| DailyTotal {
            date,
            man_days,
            amount,
            worker_count: workers.len(),
        })
        .collect()
}

/// One entry per known label, in declaration order, zero counts included.
fn count_labels<T: PartialEq + Copy + Display>(
    all: &[T],
    values: impl Iterator<Item = T>,
) -> Vec<CountByLabel> {
    let values: Vec<T> = values.collect();
    all.iter()
        .map(|&kind| CountByLabel {
            label: kind.to_string(),
            count: values.iter().filter(|&&v| v == kind).count(),
        })
        .collect()
}
