//! Error types for the stats aggregation engine.
//!
//! Aggregation itself is total over its input domain: malformed fields are
//! coerced, unknown entities produce zero vectors, and attribution anomalies
//! fall back to deterministic defaults. Errors here are reserved for the
//! cache/store I/O seams.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StatsError>;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("persistent store error: {message}")]
    Store { message: String },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<Box<dyn std::error::Error + Send + Sync>> for StatsError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        StatsError::Store {
            message: err.to_string(),
        }
    }
}
