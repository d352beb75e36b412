//! Service Error Types

use earnings_history::HistoryError;
use feature_engine::FeatureError;
use inference_engine::InferenceError;
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the forecast service. A failed request produces no rows.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Start after end, unparseable date, or range too long
    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    /// History unusable for feature generation
    #[error("Malformed history record {index}: {reason}")]
    MalformedHistory { index: usize, reason: String },

    /// Request fields other than the range are unusable
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Empty query")]
    EmptyQuery,

    #[error("History error: {0}")]
    History(#[from] HistoryError),

    #[error("Inference error: {0}")]
    Inference(#[from] InferenceError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

impl From<FeatureError> for ServiceError {
    fn from(err: FeatureError) -> Self {
        match err {
            FeatureError::InvalidRange(msg) => ServiceError::InvalidRange(msg),
            FeatureError::MalformedHistory { index, reason } => {
                ServiceError::MalformedHistory { index, reason }
            }
        }
    }
}

impl From<config::ConfigError> for ServiceError {
    fn from(err: config::ConfigError) -> Self {
        ServiceError::Config(err.to_string())
    }
}

/// Error body for callers that report failures as data
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub error: String,
}

impl ServiceError {
    /// HTTP-style status: 400 for bad input, 500 for everything else
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::InvalidRange(_)
            | ServiceError::MalformedHistory { .. }
            | ServiceError::InvalidRequest(_)
            | ServiceError::EmptyQuery => 400,
            _ => 500,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            status: self.status_code(),
            error: self.to_string(),
        }
    }
}
