//! Service Configuration
//!
//! Layered: built-in defaults, then an optional config file, then
//! `FORECAST__SECTION__KEY` environment variables.

use crate::error::ServiceError;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "FORECAST";

/// Top-level service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub model: ModelConfig,
    pub history: HistoryConfig,
    pub forecast: ForecastConfig,
    pub advisor: AdvisorConfig,
    pub logging: LoggingConfig,
}

/// Regression model artifact
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// JSON linear-model artifact; the naive baseline is used when unset
    pub path: Option<PathBuf>,
}

/// Layout of the history dataset file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryFormat {
    /// One record per driver-day
    #[default]
    Records,
    /// Work sessions, aggregated to daily totals on load
    Sessions,
}

/// Historical dataset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub path: Option<PathBuf>,
    pub format: HistoryFormat,
}

/// Forecast request handling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Currency code reported with predictions
    pub currency: String,
    /// Wellness score used when neither the request nor the history has one
    pub default_wellness_score: f64,
    /// Longest accepted forecast range, in days
    pub max_horizon_days: u32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            currency: "IDR".to_string(),
            default_wellness_score: 50.0,
            max_horizon_days: 366,
        }
    }
}

/// Prompt rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Ride-hailing platform named in prompts
    pub platform: String,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            platform: "Gojek".to_string(),
        }
    }
}

/// Logging output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    /// Emit JSON lines instead of human-readable text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from defaults, an optional file, and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ServiceError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            debug!("Reading configuration from {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<(), ServiceError> {
        if !self.forecast.default_wellness_score.is_finite() {
            return Err(ServiceError::Config(
                "forecast.default_wellness_score must be finite".to_string(),
            ));
        }
        if self.forecast.max_horizon_days == 0 {
            return Err(ServiceError::Config(
                "forecast.max_horizon_days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// `load` reads the process environment; tests calling it take this lock
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.forecast.currency, "IDR");
        assert_eq!(config.forecast.default_wellness_score, 50.0);
        assert_eq!(config.history.format, HistoryFormat::Records);
        assert!(config.model.path.is_none());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.advisor.platform, "Gojek");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let path = std::env::temp_dir().join(format!("forecast-config-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            "[forecast]\ncurrency = \"USD\"\n\n[history]\npath = \"drivers.json\"\nformat = \"sessions\"\n",
        )
        .unwrap();

        let config = ServiceConfig::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.forecast.currency, "USD");
        assert_eq!(config.forecast.default_wellness_score, 50.0);
        assert_eq!(config.history.format, HistoryFormat::Sessions);
        assert_eq!(config.history.path, Some(PathBuf::from("drivers.json")));
    }

    #[test]
    fn test_missing_file_is_error() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let path = std::env::temp_dir().join("forecast-config-does-not-exist.toml");
        assert!(matches!(
            ServiceConfig::load(Some(&path)),
            Err(ServiceError::Config(_))
        ));
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let mut config = ServiceConfig::default();
        config.forecast.max_horizon_days = 0;
        assert!(config.check().is_err());
    }

    #[test]
    fn test_environment_overrides_defaults_and_file() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let path = std::env::temp_dir().join(format!("forecast-config-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            "[forecast]\ncurrency = \"USD\"\nmax_horizon_days = 90\n\n[model]\npath = \"file-model.json\"\n",
        )
        .unwrap();

        let vars = [
            ("FORECAST__FORECAST__CURRENCY", "EUR"),
            ("FORECAST__FORECAST__MAX_HORIZON_DAYS", "30"),
            ("FORECAST__MODEL__PATH", "m.json"),
        ];
        for (key, value) in vars {
            std::env::set_var(key, value);
        }
        let from_env = ServiceConfig::load(None);
        let over_file = ServiceConfig::load(Some(&path));
        for (key, _) in vars {
            std::env::remove_var(key);
        }
        std::fs::remove_file(&path).ok();

        for config in [from_env.unwrap(), over_file.unwrap()] {
            assert_eq!(config.forecast.currency, "EUR");
            assert_eq!(config.forecast.max_horizon_days, 30);
            assert_eq!(config.model.path, Some(PathBuf::from("m.json")));
            assert_eq!(config.forecast.default_wellness_score, 50.0);
        }

        let restored = ServiceConfig::load(None).unwrap();
        assert_eq!(restored.forecast.currency, "IDR");
        assert!(restored.model.path.is_none());
    }
}
