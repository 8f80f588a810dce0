//! Locally kept copies of issued tax invoices

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::params;
use smartcon_core::InvoiceRecordRepository;
use smartcon_domain::{InvoiceRecord, Result};

use super::manager::{blocking, map_json_error, map_sql_error, DbManager};

pub struct SqliteInvoiceRecordRepository {
    db: Arc<DbManager>,
}

impl SqliteInvoiceRecordRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InvoiceRecordRepository for SqliteInvoiceRecordRepository {
    async fn save(&self, record: &InvoiceRecord) -> Result<()> {
        let body = serde_json::to_string(record).map_err(map_json_error)?;
        let (id, approval_number, issued_at) =
            (record.id.clone(), record.approval_number.clone(), record.issued_at);
        blocking(&self.db, move |conn| {
            conn.execute(
                "INSERT INTO tax_invoices (id, approval_number, issued_at, body)
                 VALUES (?1, ?2, ?3, ?4)",
                params![id, approval_number, issued_at, body],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
    }

    async fn list(&self) -> Result<Vec<InvoiceRecord>> {
        blocking(&self.db, |conn| {
            let mut stmt = conn
                .prepare("SELECT body FROM tax_invoices ORDER BY issued_at DESC, id DESC")
                .map_err(map_sql_error)?;
            let bodies = stmt
                .query_map([], |row| row.get::<_, String>(0))
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            bodies.iter().map(|b| serde_json::from_str(b).map_err(map_json_error)).collect()
        })
        .await
    }
}
