//! Driver Earnings History
//!
//! Validated per-day earnings records for each driver, with:
//! - Strict validation of untrusted dataset rows
//! - Aggregation of work sessions into daily totals
//! - A thread-safe in-memory repository keyed by driver

mod aggregate;
mod error;
mod repository;
mod validator;

pub use aggregate::{aggregate_sessions, DailySummary, SessionRecord};
pub use error::HistoryError;
pub use repository::{DriverHistory, HistoryRepository};
pub use validator::{parse_day, RawHistoryRecord, ValidatedRecord, ValidationConfig, Validator};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of a driver's activity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    /// Calendar day (timezone-naive)
    pub day: NaiveDate,
    /// Total earnings for the day
    pub total_earnings: f64,
}

impl HistoricalRecord {
    /// Create a new record
    pub fn new(day: NaiveDate, total_earnings: f64) -> Self {
        Self { day, total_earnings }
    }
}
