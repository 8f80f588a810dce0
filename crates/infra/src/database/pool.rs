//! r2d2 pool of SQLite connections with per-connection pragmas

use std::path::Path;
use std::time::Duration;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use smartcon_domain::Result;
use tracing::warn;

use crate::errors::InfraError;

pub type SqlitePool = Pool<SqliteConnectionManager>;
pub type SqliteConnection = PooledConnection<SqliteConnectionManager>;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Applied to every connection the pool opens:
/// WAL for concurrent readers, NORMAL sync, foreign keys on.
fn apply_connection_pragmas(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;\n\
         PRAGMA wal_autocheckpoint=1000;\n\
         PRAGMA synchronous=NORMAL;\n\
         PRAGMA foreign_keys=ON;",
    )?;
    conn.busy_timeout(BUSY_TIMEOUT)
}

pub fn create_pool(path: &Path, max_size: u32) -> Result<SqlitePool> {
    let manager =
        SqliteConnectionManager::file(path).with_init(|conn| apply_connection_pragmas(conn));

    Pool::builder()
        .max_size(max_size.max(1))
        .connection_timeout(CONNECTION_TIMEOUT)
        .build(manager)
        .map_err(|e| {
            warn!(db_path = %path.display(), error = %e, "failed to create connection pool");
            InfraError::from(e).into()
        })
}
