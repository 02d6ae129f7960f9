//! Persistent key-value collaborators backing the result cache.
//!
//! The engine treats persistence as an opaque store with stored-at
//! timestamps; TTL policy lives in the cache, not here. Two implementations:
//! SQLite on disk for the application, a hash map for tests and embedders
//! that bring their own persistence.

use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Result, StatsError};

/// A persisted value plus the moment it was written (unix seconds).
#[derive(Debug, Clone, PartialEq)]
pub struct StoredEntry {
    pub value: Value,
    pub stored_at: i64,
}

/// Opaque key-value persistence contract.
pub trait PersistentStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<StoredEntry>>;
    fn set(&self, key: &str, value: &Value, stored_at: i64) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// In-memory store; no persistence across processes.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, StoredEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PersistentStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<StoredEntry>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &Value, stored_at: i64) -> Result<()> {
        self.entries.lock().unwrap().insert(
            key.to_string(),
            StoredEntry {
                value: value.clone(),
                stored_at,
            },
        );
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.entries.lock().unwrap().clear();
        Ok(())
    }
}

/// SQLite-backed store, one row per cache key.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the store at the default cache location,
    /// `<cache dir>/footstats/results.db`.
    pub fn open_default() -> Result<Self> {
        let path = Self::default_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::open(&path)
    }

    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// In-memory database, for tests.
    pub fn new_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS cached_results (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                stored_at INTEGER NOT NULL
            )",
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn default_path() -> Result<PathBuf> {
        let base = dirs::cache_dir().ok_or_else(|| StatsError::Store {
            message: "could not determine cache directory".to_string(),
        })?;
        Ok(base.join("footstats").join("results.db"))
    }
}

impl PersistentStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<StoredEntry>> {
        let conn = self.conn.lock().unwrap();
        let row: Option<(String, i64)> = conn
            .query_row(
                "SELECT value, stored_at FROM cached_results WHERE key = ?",
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        match row {
            Some((text, stored_at)) => Ok(Some(StoredEntry {
                value: serde_json::from_str(&text)?,
                stored_at,
            })),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &Value, stored_at: i64) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO cached_results (key, value, stored_at)
             VALUES (?, ?, ?)",
            params![key, serde_json::to_string(value)?, stored_at],
        )?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM cached_results", [])?;
        Ok(())
    }
}
