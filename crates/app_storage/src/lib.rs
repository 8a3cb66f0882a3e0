//! Folio storage layer
//!
//! Provides:
//! - The `KeyValueStore` trait (browser-storage style string keys and values)
//! - SQLite-backed persistent storage surviving across sessions
//! - In-memory session storage living as long as the process

mod memory;
mod pool;
mod schema;
mod sqlite;

pub use memory::MemoryStore;
pub use pool::DbPool;
pub use schema::migrate;
pub use sqlite::SqliteStore;

use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Synchronous string key-value storage.
///
/// Mirrors the browser `Storage` API: writes are applied immediately and a
/// later `set_item` on the same key replaces the earlier value.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`; missing keys are not an error
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Delete every key
    fn clear(&self) -> Result<()>;
}

/// Default data directory for the persistent store
pub fn data_dir() -> PathBuf {
    ProjectDirs::from("dev", "Folio", "Folio")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./data"))
}

/// Open the persistent store inside `dir`, creating it when needed
pub fn open_local(dir: &Path) -> Result<SqliteStore> {
    std::fs::create_dir_all(dir)?;
    let store = SqliteStore::open(&dir.join("storage.db"))?;
    tracing::info!("Persistent storage initialized at {:?}", dir);
    Ok(store)
}
