//! Driver Earnings Forecast Service
//!
//! Wires history, feature generation and inference behind one
//! `ForecastService` value, plus the welfare advisor prompts.

mod config;
mod error;
mod request;
mod service;

pub use config::{
    AdvisorConfig, ForecastConfig, HistoryConfig, HistoryFormat, LoggingConfig, ModelConfig,
    ServiceConfig, ENV_PREFIX,
};
pub use error::{ErrorResponse, ServiceError};
pub use request::{DailyPrediction, ForecastRequest, ForecastResponse};
pub use service::ForecastService;

use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Initialize logging. Output goes to stderr so stdout stays machine-readable.
pub fn init_logging(config: &LoggingConfig) -> Result<(), ServiceError> {
    let level = Level::from_str(&config.level)
        .map_err(|_| ServiceError::Config(format!("unknown log level {:?}", config.level)))?;

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    let result = if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    result.map_err(|e| ServiceError::Logging(e.to_string()))
}
