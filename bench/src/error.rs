//! Error types for the benchmark harness.

use thiserror::Error;

/// Result type alias using [`BenchError`].
pub type Result<T> = std::result::Result<T, BenchError>;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("engine error: {0}")]
    Engine(#[from] keyset::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
