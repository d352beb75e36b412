//! Request and Response Types

use crate::error::ServiceError;
use chrono::NaiveDate;
use feature_engine::{inclusive_day_count, parse_date};
use serde::{Deserialize, Serialize};

/// Forecast request, dates as `YYYY-MM-DD`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub driver_id: String,
    pub start: String,
    pub end: String,
    /// Overrides the wellness score taken from history
    #[serde(default)]
    pub wellness_score: Option<f64>,
}

impl ForecastRequest {
    pub fn new(driver_id: impl Into<String>, start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            driver_id: driver_id.into(),
            start: start.into(),
            end: end.into(),
            wellness_score: None,
        }
    }

    pub fn with_wellness(mut self, score: f64) -> Self {
        self.wellness_score = Some(score);
        self
    }

    /// Parse and check the range; `max_days` bounds its length
    pub fn date_range(&self, max_days: u32) -> Result<(NaiveDate, NaiveDate), ServiceError> {
        let start = parse_date("start", &self.start)?;
        let end = parse_date("end", &self.end)?;
        if start > end {
            return Err(ServiceError::InvalidRange(format!(
                "start {} is after end {}",
                start, end
            )));
        }
        let days = inclusive_day_count(start, end);
        if days > max_days as usize {
            return Err(ServiceError::InvalidRange(format!(
                "{} days requested, at most {} allowed",
                days, max_days
            )));
        }
        Ok((start, end))
    }

    /// Check fields other than the dates
    pub fn check(&self) -> Result<(), ServiceError> {
        if self.driver_id.trim().is_empty() {
            return Err(ServiceError::InvalidRequest("driver_id is empty".to_string()));
        }
        self.check_wellness()
    }

    /// Check the wellness override alone, for requests without a driver
    pub fn check_wellness(&self) -> Result<(), ServiceError> {
        if let Some(score) = self.wellness_score {
            if !score.is_finite() {
                return Err(ServiceError::InvalidRequest(
                    "wellness_score must be finite".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// One predicted day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPrediction {
    /// `YYYY-MM-DD`
    pub date: String,
    pub predicted_earnings: f64,
}

/// Forecast result, predictions in request day order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub status: String,
    pub currency: String,
    pub driver_id: String,
    pub model: String,
    pub predictions: Vec<DailyPrediction>,
}
