//! Error types for the keyset engines.

use thiserror::Error;

/// Result type alias using the crate [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Failures an engine reports to its caller.
///
/// Absent keys and duplicate inserts are ordinary `false` results and never
/// show up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Open-addressing insert attempted while every slot holds a live key.
    #[error("hash table full: all {size} slots occupied")]
    TableFull { size: usize },

    /// Table-backed engines need at least two slots.
    #[error("invalid table size {size}: must be greater than 1")]
    InvalidTableSize { size: usize },

    /// Probe method name that is not one of `linear`, `quadratic`, `double`.
    #[error("unknown probe method {0:?} (expected linear, quadratic or double)")]
    UnknownProbeMethod(String),
}
