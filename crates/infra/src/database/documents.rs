//! Master-data collections stored as JSON documents

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use smartcon_core::{MasterRepository, WorkerRepository};
use smartcon_domain::{
    now_timestamp, MasterRecord, ReferenceField, ReferenceFix, Result, SmartconError, Worker,
    WorkerPatch,
};
use tracing::debug;

use super::manager::{blocking, map_json_error, map_sql_error, DbManager};

/// One collection of the `documents` table, typed by its record.
pub struct SqliteDocumentRepository<T> {
    db: Arc<DbManager>,
    _record: PhantomData<fn() -> T>,
}

impl<T: MasterRecord> SqliteDocumentRepository<T> {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db, _record: PhantomData }
    }
}

fn read_body<T: MasterRecord>(conn: &Connection, id: &str) -> Result<Option<T>> {
    let body: Option<String> = conn
        .query_row(
            "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
            params![T::COLLECTION, id],
            |row| row.get(0),
        )
        .optional()
        .map_err(map_sql_error)?;
    body.map(|b| serde_json::from_str(&b).map_err(map_json_error)).transpose()
}

fn write_body<T: MasterRecord>(conn: &Connection, record: &T) -> Result<usize> {
    let body = serde_json::to_string(record).map_err(map_json_error)?;
    conn.execute(
        "UPDATE documents SET name = ?3, body = ?4, updated_at = ?5
         WHERE collection = ?1 AND id = ?2",
        params![T::COLLECTION, record.id(), record.name(), body, now_timestamp()],
    )
    .map_err(map_sql_error)
}

#[async_trait]
impl<T: MasterRecord> MasterRepository<T> for SqliteDocumentRepository<T> {
    async fn list(&self) -> Result<Vec<T>> {
        blocking(&self.db, |conn| {
            let mut stmt = conn
                .prepare("SELECT body FROM documents WHERE collection = ?1 ORDER BY name, id")
                .map_err(map_sql_error)?;
            let bodies = stmt
                .query_map(params![T::COLLECTION], |row| row.get::<_, String>(0))
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            bodies.iter().map(|b| serde_json::from_str(b).map_err(map_json_error)).collect()
        })
        .await
    }

    async fn get(&self, id: &str) -> Result<Option<T>> {
        let id = id.to_string();
        blocking(&self.db, move |conn| read_body(conn, &id)).await
    }

    async fn create(&self, record: &T) -> Result<()> {
        let record = record.clone();
        blocking(&self.db, move |conn| {
            let body = serde_json::to_string(&record).map_err(map_json_error)?;
            conn.execute(
                "INSERT INTO documents (collection, id, name, body, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![T::COLLECTION, record.id(), record.name(), body, now_timestamp()],
            )
            .map_err(map_sql_error)?;
            debug!(collection = T::COLLECTION, id = record.id(), "document created");
            Ok(())
        })
        .await
    }

    async fn update(&self, record: &T) -> Result<()> {
        let record = record.clone();
        blocking(&self.db, move |conn| {
            if write_body(conn, &record)? == 0 {
                return Err(SmartconError::not_found(T::COLLECTION, record.id()));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        blocking(&self.db, move |conn| {
            let removed = conn
                .execute(
                    "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
                    params![T::COLLECTION, id],
                )
                .map_err(map_sql_error)?;
            Ok(removed > 0)
        })
        .await
    }
}

/// Read-modify-write every listed worker inside one transaction.
fn modify_workers<F>(conn: &Connection, ids: &[String], mut change: F) -> Result<usize>
where
    F: FnMut(usize, &mut Worker) -> bool,
{
    let tx = conn.unchecked_transaction().map_err(map_sql_error)?;
    let mut written = 0;
    for (index, id) in ids.iter().enumerate() {
        let Some(mut worker) = read_body::<Worker>(&tx, id)? else { continue };
        if change(index, &mut worker) {
            write_body(&tx, &worker)?;
            written += 1;
        }
    }
    tx.commit().map_err(map_sql_error)?;
    Ok(written)
}

#[async_trait]
impl WorkerRepository for SqliteDocumentRepository<Worker> {
    async fn update_many(&self, ids: &[String], patch: &WorkerPatch) -> Result<usize> {
        let ids = ids.to_vec();
        let patch = patch.clone();
        let now = now_timestamp();
        blocking(&self.db, move |conn| {
            modify_workers(conn, &ids, |_, worker| {
                worker.apply_patch(&patch);
                worker.touch(now);
                true
            })
        })
        .await
    }

    async fn set_reference_names(&self, fixes: &[ReferenceFix]) -> Result<usize> {
        let fixes = fixes.to_vec();
        let ids: Vec<String> = fixes.iter().map(|f| f.worker_id.clone()).collect();
        blocking(&self.db, move |conn| {
            modify_workers(conn, &ids, |index, worker| {
                let fix = &fixes[index];
                let reference = match fix.field {
                    ReferenceField::Team => worker.team.as_mut(),
                    ReferenceField::Site => worker.site.as_mut(),
                    ReferenceField::Company => worker.company.as_mut(),
                };
                match reference.filter(|r| r.id == fix.referenced_id) {
                    Some(reference) => {
                        reference.name = fix.name.clone();
                        true
                    }
                    None => false,
                }
            })
        })
        .await
    }
}
