//! History Error Types

use thiserror::Error;

/// Errors while validating or loading driver history
#[derive(Debug, Error)]
pub enum HistoryError {
    /// A record is missing a field or carries an unusable value
    #[error("Malformed history record {index}: {reason}")]
    MalformedHistory { index: usize, reason: String },

    /// Dataset could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Dataset is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Repository lock was poisoned
    #[error("Lock error: {0}")]
    Lock(String),
}

impl HistoryError {
    /// Create a malformed-record error
    pub fn malformed(index: usize, reason: impl Into<String>) -> Self {
        HistoryError::MalformedHistory {
            index,
            reason: reason.into(),
        }
    }
}
