//! Earnings Forecast - Command Line Entry Point

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use forecast_service::{init_logging, ForecastRequest, ForecastService, ServiceConfig, ServiceError};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "earnings-forecast")]
#[command(version, about = "Daily earnings forecasts and welfare prompts for drivers")]
struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Predict daily earnings for a driver
    Predict {
        #[arg(long)]
        driver: String,
        /// First day, YYYY-MM-DD
        #[arg(long)]
        start: String,
        /// Last day, YYYY-MM-DD (inclusive)
        #[arg(long)]
        end: String,
        #[arg(long)]
        wellness: Option<f64>,
    },
    /// Print the generated feature table without running the model
    Features {
        /// Driver whose history feeds the lags; empty history when omitted
        #[arg(long)]
        driver: Option<String>,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        #[arg(long)]
        wellness: Option<f64>,
    },
    /// Build the assistant prompt for a welfare question
    Prompt {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// List drivers in the history dataset
    Drivers,
}

#[derive(Serialize)]
struct DriverSummary {
    driver_id: String,
    records: usize,
    first_day: Option<String>,
    last_day: Option<String>,
}

fn request(driver: String, start: String, end: String, wellness: Option<f64>) -> ForecastRequest {
    let request = ForecastRequest::new(driver, start, end);
    match wellness {
        Some(score) => request.with_wellness(score),
        None => request,
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print the error body, then fail the process
fn report(err: ServiceError) -> Result<()> {
    print_json(&err.to_response())?;
    Err(err.into())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ServiceConfig::load(cli.config.as_deref()).context("loading configuration")?;
    init_logging(&config.logging).context("initializing logging")?;

    info!("=== Earnings Forecast v{} ===", env!("CARGO_PKG_VERSION"));
    let service = ForecastService::from_config(config).context("starting forecast service")?;

    match cli.command {
        Command::Predict { driver, start, end, wellness } => {
            match service.forecast(&request(driver, start, end, wellness)) {
                Ok(response) => print_json(&response),
                Err(e) => report(e),
            }
        }
        Command::Features { driver, start, end, wellness } => {
            let rows = match driver {
                Some(driver) => service.features(&request(driver, start, end, wellness)),
                None => service.features_without_history(&request(String::new(), start, end, wellness)),
            };
            match rows {
                Ok(rows) => print_json(&rows),
                Err(e) => report(e),
            }
        }
        Command::Prompt { query } => match service.advise(&query.join(" ")) {
            Ok(prompt) => print_json(&prompt),
            Err(e) => report(e),
        },
        Command::Drivers => {
            let mut drivers = Vec::new();
            for driver_id in service.history().driver_ids()? {
                if let Some(history) = service.history().history(&driver_id)? {
                    drivers.push(DriverSummary {
                        records: history.len(),
                        first_day: history.first_day().map(|d| d.to_string()),
                        last_day: history.last_day().map(|d| d.to_string()),
                        driver_id,
                    });
                }
            }
            print_json(&drivers)
        }
    }
}
