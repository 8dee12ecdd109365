//! Error types for npc-output.

use thiserror::Error;

/// Failures raised by an [`OutputWriter`](crate::OutputWriter) backend.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("output I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv backend: {0}")]
    Csv(#[from] csv::Error),

    #[error("could not encode payload as JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "sqlite")]
    #[error("sqlite backend: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type OutputResult<T> = Result<T, OutputError>;
