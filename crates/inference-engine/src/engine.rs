//! Inference Engine Implementation

use crate::model::{LinearModel, NaiveModel};
use crate::{InferenceError, Regressor};
use feature_engine::{ForecastRow, FEATURE_COLUMNS};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Predictions for a batch of rows, aligned by position
#[derive(Debug, Clone)]
pub struct BatchPrediction {
    pub predictions: Vec<f64>,
    /// Model that produced the batch
    pub model: String,
    /// Inference latency in milliseconds
    pub latency_ms: u64,
}

/// Inference engine around a regression model whose inputs match the feature table
pub struct InferenceEngine {
    model: Box<dyn Regressor>,
}

impl InferenceEngine {
    /// Wrap a model, checking its inputs are exactly `FEATURE_COLUMNS` in order
    pub fn new(model: Box<dyn Regressor>) -> Result<Self, InferenceError> {
        let aligned = model.feature_names().len() == FEATURE_COLUMNS.len()
            && model
                .feature_names()
                .iter()
                .zip(FEATURE_COLUMNS.iter())
                .all(|(a, b)| a == b);
        if !aligned {
            return Err(InferenceError::FeatureMismatch {
                expected: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
                actual: model.feature_names().to_vec(),
            });
        }

        info!("Creating inference engine with model: {}", model.name());
        Ok(Self { model })
    }

    /// Engine backed by the naive baseline model
    pub fn naive() -> Self {
        info!("Creating inference engine with naive baseline model");
        Self {
            model: Box::new(NaiveModel::new()),
        }
    }

    /// Engine backed by a linear model artifact on disk
    pub fn from_artifact(path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let model = LinearModel::load(path)?;
        Self::new(Box::new(model))
    }

    /// Predict every row; fails as a whole if any row fails
    pub fn predict_rows(&self, rows: &[ForecastRow]) -> Result<BatchPrediction, InferenceError> {
        let start = Instant::now();

        let predictions = rows
            .iter()
            .map(|row| {
                let value = self.model.predict(&row.feature_values())?;
                if !value.is_finite() {
                    return Err(InferenceError::InferenceFailed(format!(
                        "non-finite prediction for {}",
                        row.timestamp
                    )));
                }
                Ok(value)
            })
            .collect::<Result<Vec<f64>, InferenceError>>()?;

        let latency_ms = start.elapsed().as_millis() as u64;
        debug!(
            "Predicted {} rows with {} in {}ms",
            predictions.len(),
            self.model.name(),
            latency_ms
        );

        Ok(BatchPrediction {
            predictions,
            model: self.model.name().to_string(),
            latency_ms,
        })
    }

    /// Get model name
    pub fn model_name(&self) -> &str {
        self.model.name()
    }
}
