//! Feature Generation Errors

use thiserror::Error;

/// Errors that abort feature generation before any row is produced
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// Start after end, or a date that does not parse
    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    /// A history record carries an unusable earnings value
    #[error("Malformed history record {index}: {reason}")]
    MalformedHistory { index: usize, reason: String },
}
