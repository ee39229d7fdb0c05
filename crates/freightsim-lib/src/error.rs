use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the freightsim library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// An unreachable routing target is deliberately not represented here:
/// route queries return `Ok(None)` for the no-route outcome and reserve
/// errors for invalid input and construction failures.
#[derive(Debug, Error)]
pub enum Error {
    /// Prepared network dataset could not be located at the resolved path.
    #[error("network dataset not found at {path}")]
    DatasetNotFound { path: PathBuf },

    /// Prepared network dataset was present but malformed.
    #[error("failed to parse network dataset at {path}: {message}")]
    DatasetParse { path: PathBuf, message: String },

    /// Referenced node identifier is not present in the registry.
    #[error("unknown node: {id}")]
    UnknownNode { id: String },

    /// Weather severity outside the accepted [0, 1] range.
    #[error("invalid weather severity {value}; expected a value in [0, 1]")]
    InvalidSeverity { value: f64 },

    /// Pain point index does not reference an active pain point.
    #[error("pain point index {index} out of range (active pain points: {len})")]
    PainPointOutOfRange { index: usize, len: usize },

    /// Objective weights failed validation (negative, non-finite, or zero-sum).
    #[error("invalid objective weights: {message}")]
    InvalidWeights { message: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
