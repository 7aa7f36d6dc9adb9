use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Postgres error: {0}")]
    Postgres(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connect attempt timed out after {timeout:?}")]
    ConnectTimeout { timeout: Duration },

    #[error("Database unreachable after {attempts} attempts: {last_error}")]
    ConnectRetriesExhausted { attempts: u32, last_error: String },

    #[error("Invalid value for {key}: '{value}'")]
    InvalidConfig { key: String, value: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ReportResult<T> = Result<T, ReportError>;
