//! Error types for the featcast library.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type alias for featcast operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while building datasets, fitting or validating.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Timestamp-related error.
    #[error("timestamp error: {0}")]
    TimestampError(String),

    /// Model has not been fitted yet.
    #[error("model must be fitted first")]
    FitRequired,

    /// Missing values detected when not allowed.
    #[error("missing values detected in data")]
    MissingValues,

    /// Frequency inference or parsing failed.
    #[error("could not infer frequency: {0}")]
    FrequencyInference(String),

    /// Index out of bounds.
    #[error("index out of bounds: {index} (size: {size})")]
    IndexOutOfBounds { index: usize, size: usize },

    /// Feature and target tables share no timestamp.
    #[error("feature and target tables have no timestamp in common")]
    EmptyAlignment,

    /// The most recent feature row is older than the last observation, so a
    /// forecast from it would cover already observed timestamps.
    #[error("latest feature row {last_feature} precedes last observation {last_observed}")]
    StaleFeatures {
        last_feature: DateTime<Utc>,
        last_observed: DateTime<Utc>,
    },

    /// Computation error (e.g., numerical issues, worker pool failures).
    #[error("computation error: {0}")]
    ComputationError(String),
}
