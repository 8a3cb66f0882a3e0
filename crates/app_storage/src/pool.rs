//! SQLite connection pool

use crate::{Result, StorageError};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use std::path::Path;
use std::time::Duration;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Preference writes are small and rare; a few connections are plenty
const MAX_CONNECTIONS: u32 = 4;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open a pool on the database file at `path`
pub fn init_pool(path: &Path) -> Result<DbPool> {
    let manager = SqliteConnectionManager::file(path).with_init(|conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(())
    });

    let pool = Pool::builder()
        .max_size(MAX_CONNECTIONS)
        .min_idle(Some(1))
        .build(manager)
        .map_err(|e| StorageError::Pool(e.to_string()))?;

    tracing::debug!(path = %path.display(), "SQLite pool ready");
    Ok(pool)
}
