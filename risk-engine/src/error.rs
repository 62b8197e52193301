//! Error types for risk engine

use thiserror::Error;

/// Risk engine error
///
/// Malformed intake details are never an error: they score as zero
/// contribution. The only failure the engine itself raises is a bad
/// weight table.
#[derive(Debug, Error)]
pub enum Error {
    /// Weight table rejected at engine construction
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
