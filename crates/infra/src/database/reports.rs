//! Daily labor reports

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, ToSql};
use smartcon_core::DailyReportRepository;
use smartcon_domain::{DailyReport, Result, SmartconError};
use tracing::info;

use super::manager::{blocking, map_json_error, map_sql_error, DbManager};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SqliteDailyReportRepository {
    db: Arc<DbManager>,
}

impl SqliteDailyReportRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    async fn query(&self, sql: &'static str, args: Vec<String>) -> Result<Vec<DailyReport>> {
        blocking(&self.db, move |conn| select_reports(conn, sql, &args)).await
    }
}

fn day(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn select_reports(conn: &Connection, sql: &str, args: &[String]) -> Result<Vec<DailyReport>> {
    let mut stmt = conn.prepare(sql).map_err(map_sql_error)?;
    let params: Vec<&dyn ToSql> = args.iter().map(|a| a as &dyn ToSql).collect();
    let bodies = stmt
        .query_map(params.as_slice(), |row| row.get::<_, String>(0))
        .map_err(map_sql_error)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(map_sql_error)?;
    bodies.iter().map(|b| serde_json::from_str(b).map_err(map_json_error)).collect()
}

#[async_trait]
impl DailyReportRepository for SqliteDailyReportRepository {
    async fn reports_for_date(&self, date: NaiveDate) -> Result<Vec<DailyReport>> {
        self.query("SELECT body FROM daily_reports WHERE date = ?1 ORDER BY id", vec![day(date)])
            .await
    }

    async fn reports_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyReport>> {
        self.query(
            "SELECT body FROM daily_reports WHERE date BETWEEN ?1 AND ?2 ORDER BY date, id",
            vec![day(start), day(end)],
        )
        .await
    }

    async fn latest_date_before(
        &self,
        team_id: &str,
        date: NaiveDate,
    ) -> Result<Option<NaiveDate>> {
        let team_id = team_id.to_string();
        let before = day(date);
        blocking(&self.db, move |conn| {
            let latest: Option<String> = conn
                .query_row(
                    "SELECT MAX(date) FROM daily_reports WHERE team_id = ?1 AND date < ?2",
                    params![team_id, before],
                    |row| row.get(0),
                )
                .optional()
                .map_err(map_sql_error)?
                .flatten();
            latest
                .map(|raw| {
                    NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|e| {
                        SmartconError::Database(format!("stored report date {raw:?}: {e}"))
                    })
                })
                .transpose()
        })
        .await
    }

    async fn team_reports_for_date(
        &self,
        team_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<DailyReport>> {
        self.query(
            "SELECT body FROM daily_reports WHERE team_id = ?1 AND date = ?2 ORDER BY id",
            vec![team_id.to_string(), day(date)],
        )
        .await
    }

    async fn replace_for_date(&self, date: NaiveDate, reports: &[DailyReport]) -> Result<usize> {
        if let Some(stray) = reports.iter().find(|r| r.date != date) {
            return Err(SmartconError::InvalidInput(format!(
                "report {} is dated {}, not {date}",
                stray.id, stray.date
            )));
        }

        let reports = reports.to_vec();
        let date_key = day(date);
        blocking(&self.db, move |conn| {
            let tx = conn.unchecked_transaction().map_err(map_sql_error)?;
            let removed = tx
                .execute("DELETE FROM daily_reports WHERE date = ?1", params![date_key])
                .map_err(map_sql_error)?;
            for report in &reports {
                let body = serde_json::to_string(report).map_err(map_json_error)?;
                tx.execute(
                    "INSERT INTO daily_reports (id, date, team_id, site_id, body)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![report.id, date_key, report.team.id, report.site.id, body],
                )
                .map_err(map_sql_error)?;
            }
            tx.commit().map_err(map_sql_error)?;
            info!(date = %date_key, removed, inserted = reports.len(), "daily reports replaced");
            Ok(reports.len())
        })
        .await
    }
}
