//! Earnings Inference Engine
//!
//! Runs a pre-trained regression model over generated feature rows.

mod engine;
mod model;

pub use engine::{BatchPrediction, InferenceEngine};
pub use model::{LinearModel, NaiveModel};

use thiserror::Error;

/// Errors during model loading or inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error("Model features do not match generated features: expected {expected:?}, got {actual:?}")]
    FeatureMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: usize, actual: usize },
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
}

/// A trained model that maps one feature row to a predicted value.
///
/// Features arrive in `feature_names()` order; `None` marks an unset value.
pub trait Regressor: Send + Sync {
    /// Model identifier for logs and responses
    fn name(&self) -> &str;

    /// Input names the model was trained on, in order
    fn feature_names(&self) -> &[String];

    /// Predict from one row of features
    fn predict(&self, features: &[Option<f64>]) -> Result<f64, InferenceError>;
}
