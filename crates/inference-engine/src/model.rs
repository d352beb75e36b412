//! Regression Models

use crate::{InferenceError, Regressor};
use feature_engine::FEATURE_COLUMNS;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Linear model exported as a JSON artifact.
///
/// Unset features are replaced by their `fill_values` entry, or 0.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    #[serde(default = "default_name")]
    pub name: String,
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub fill_values: HashMap<String, f64>,
}

fn default_name() -> String {
    "linear".to_string()
}

impl LinearModel {
    /// Parse and check an artifact
    pub fn from_json_str(text: &str) -> Result<Self, InferenceError> {
        let model: Self = serde_json::from_str(text)
            .map_err(|e| InferenceError::ModelLoadError(format!("invalid artifact: {}", e)))?;
        model.check()?;
        Ok(model)
    }

    /// Load an artifact from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let path = path.as_ref();
        info!("Loading linear model from {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|e| {
            InferenceError::ModelLoadError(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&text)
    }

    fn check(&self) -> Result<(), InferenceError> {
        if self.coefficients.len() != self.feature_names.len() {
            return Err(InferenceError::ModelLoadError(format!(
                "{} coefficients for {} features",
                self.coefficients.len(),
                self.feature_names.len()
            )));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(InferenceError::ModelLoadError(
                "non-finite model parameter".to_string(),
            ));
        }
        if let Some((name, _)) = self.fill_values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(InferenceError::ModelLoadError(format!(
                "non-finite fill value for {}",
                name
            )));
        }
        debug!(
            "Linear model {} checked: {} features",
            self.name,
            self.feature_names.len()
        );
        Ok(())
    }
}

impl Regressor for LinearModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, features: &[Option<f64>]) -> Result<f64, InferenceError> {
        if features.len() != self.coefficients.len() {
            return Err(InferenceError::InvalidInputShape {
                expected: self.coefficients.len(),
                actual: features.len(),
            });
        }

        let mut total = self.intercept;
        for ((value, coef), name) in features
            .iter()
            .zip(&self.coefficients)
            .zip(&self.feature_names)
        {
            let x = match value {
                Some(v) => *v,
                None => self.fill_values.get(name).copied().unwrap_or(0.0),
            };
            total += coef * x;
        }
        Ok(total)
    }
}

/// Baseline model: yesterday's earnings, else the 7-record mean, else zero
#[derive(Debug, Clone)]
pub struct NaiveModel {
    feature_names: Vec<String>,
    lag_1: usize,
    rolling_mean_7: usize,
}

impl NaiveModel {
    pub fn new() -> Self {
        let feature_names: Vec<String> = FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect();
        let position = |column: &str| FEATURE_COLUMNS.iter().position(|c| *c == column).unwrap_or(0);
        Self {
            lag_1: position("lag_1"),
            rolling_mean_7: position("rolling_mean_7"),
            feature_names,
        }
    }
}

impl Default for NaiveModel {
    fn default() -> Self {
        Self::new()
    }
}

impl Regressor for NaiveModel {
    fn name(&self) -> &str {
        "naive"
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, features: &[Option<f64>]) -> Result<f64, InferenceError> {
        if features.len() != self.feature_names.len() {
            return Err(InferenceError::InvalidInputShape {
                expected: self.feature_names.len(),
                actual: features.len(),
            });
        }
        Ok(features[self.lag_1]
            .or(features[self.rolling_mean_7])
            .unwrap_or(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(coefficients: &[f64]) -> String {
        serde_json::json!({
            "name": "test-linear",
            "feature_names": FEATURE_COLUMNS,
            "coefficients": coefficients,
            "intercept": 1000.0,
            "fill_values": { "lag_1": 50.0 }
        })
        .to_string()
    }

    #[test]
    fn test_linear_prediction_with_fill() {
        let mut coefficients = vec![0.0; FEATURE_COLUMNS.len()];
        coefficients[2] = 10.0; // wellness_score
        coefficients[6] = 2.0; // lag_1
        let model = LinearModel::from_json_str(&artifact(&coefficients)).unwrap();

        let mut features = vec![None; FEATURE_COLUMNS.len()];
        features[2] = Some(40.0);
        // lag_1 unset -> filled with 50
        let prediction = model.predict(&features).unwrap();
        assert!((prediction - (1000.0 + 400.0 + 100.0)).abs() < 1e-9);

        features[6] = Some(300.0);
        let prediction = model.predict(&features).unwrap();
        assert!((prediction - (1000.0 + 400.0 + 600.0)).abs() < 1e-9);
    }

    #[test]
    fn test_linear_rejects_coefficient_mismatch() {
        let result = LinearModel::from_json_str(&artifact(&[1.0, 2.0]));
        assert!(matches!(result, Err(InferenceError::ModelLoadError(_))));
    }

    #[test]
    fn test_linear_rejects_bad_json() {
        assert!(LinearModel::from_json_str("{ not json").is_err());
    }

    #[test]
    fn test_linear_rejects_wrong_row_width() {
        let model =
            LinearModel::from_json_str(&artifact(&vec![0.0; FEATURE_COLUMNS.len()])).unwrap();
        let result = model.predict(&[Some(1.0)]);
        assert!(matches!(
            result,
            Err(InferenceError::InvalidInputShape { expected: 20, actual: 1 })
        ));
    }

    #[test]
    fn test_naive_fallbacks() {
        let model = NaiveModel::new();
        let mut features = vec![None; FEATURE_COLUMNS.len()];
        assert_eq!(model.predict(&features).unwrap(), 0.0);

        features[3] = Some(120.0); // rolling_mean_7
        assert_eq!(model.predict(&features).unwrap(), 120.0);

        features[6] = Some(90.0); // lag_1
        assert_eq!(model.predict(&features).unwrap(), 90.0);
    }
}
