//! Payroll settings document and advance deductions

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};
use smartcon_core::{AdvanceDeductionRepository, PayrollConfigStore};
use smartcon_domain::constants::PAYROLL_CONFIG_KEY;
use smartcon_domain::{now_timestamp, AdvanceDeduction, PayrollConfig, Result};

use super::manager::{blocking, map_json_error, map_sql_error, DbManager};

pub struct SqlitePayrollConfigStore {
    db: Arc<DbManager>,
}

impl SqlitePayrollConfigStore {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PayrollConfigStore for SqlitePayrollConfigStore {
    async fn load(&self) -> Result<Option<PayrollConfig>> {
        blocking(&self.db, |conn| {
            let body: Option<String> = conn
                .query_row(
                    "SELECT body FROM settings WHERE key = ?1",
                    params![PAYROLL_CONFIG_KEY],
                    |row| row.get(0),
                )
                .optional()
                .map_err(map_sql_error)?;
            body.map(|b| serde_json::from_str(&b).map_err(map_json_error)).transpose()
        })
        .await
    }

    async fn save(&self, config: &PayrollConfig) -> Result<()> {
        let body = serde_json::to_string(config).map_err(map_json_error)?;
        blocking(&self.db, move |conn| {
            conn.execute(
                "INSERT INTO settings (key, body, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET body = excluded.body, updated_at = excluded.updated_at",
                params![PAYROLL_CONFIG_KEY, body, now_timestamp()],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
    }
}

pub struct SqliteAdvanceDeductionRepository {
    db: Arc<DbManager>,
}

impl SqliteAdvanceDeductionRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AdvanceDeductionRepository for SqliteAdvanceDeductionRepository {
    async fn in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<AdvanceDeduction>> {
        let start = start.format("%Y-%m-%d").to_string();
        let end = end.format("%Y-%m-%d").to_string();
        blocking(&self.db, move |conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT body FROM advance_deductions WHERE date BETWEEN ?1 AND ?2
                     ORDER BY date, id",
                )
                .map_err(map_sql_error)?;
            let bodies = stmt
                .query_map(params![start, end], |row| row.get::<_, String>(0))
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            bodies.iter().map(|b| serde_json::from_str(b).map_err(map_json_error)).collect()
        })
        .await
    }

    async fn save(&self, deduction: &AdvanceDeduction) -> Result<()> {
        let body = serde_json::to_string(deduction).map_err(map_json_error)?;
        let (id, worker_id) = (deduction.id.clone(), deduction.worker_id.clone());
        let date = deduction.date.format("%Y-%m-%d").to_string();
        blocking(&self.db, move |conn| {
            conn.execute(
                "INSERT INTO advance_deductions (id, worker_id, date, body) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(id) DO UPDATE SET worker_id = excluded.worker_id,
                     date = excluded.date, body = excluded.body",
                params![id, worker_id, date, body],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        blocking(&self.db, move |conn| {
            let removed = conn
                .execute("DELETE FROM advance_deductions WHERE id = ?1", params![id])
                .map_err(map_sql_error)?;
            Ok(removed > 0)
        })
        .await
    }
}
