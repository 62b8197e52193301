//! Error types for the intake store

use thiserror::Error;
use uuid::Uuid;

/// Result type for store and scoring operations
pub type Result<T> = std::result::Result<T, Error>;

/// Intake store errors
#[derive(Error, Debug)]
pub enum Error {
    /// Storage error (RocksDB)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Score record encoding error
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// Intake request encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Intake request not found
    #[error("Request not found: {0}")]
    RequestNotFound(Uuid),

    /// No score computed yet for the request
    #[error("Risk score not found for request {0}, compute it first")]
    ScoreNotFound(Uuid),

    /// Request details changed between scoring and commit
    #[error("Request {0} changed while its score was computed, compute it again")]
    StaleRequest(Uuid),

    /// No review task opened for the request
    #[error("Review task not found for request {0}")]
    ReviewTaskNotFound(Uuid),

    /// Scoring engine error (weight table)
    #[error(transparent)]
    Engine(#[from] risk_engine::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Metrics registration error
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for unknown request, missing score or missing review task
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::RequestNotFound(_) | Error::ScoreNotFound(_) | Error::ReviewTaskNotFound(_)
        )
    }
}

impl From<rocksdb::Error> for Error {
    fn from(err: rocksdb::Error) -> Self {
        Error::Storage(err.to_string())
    }
}
