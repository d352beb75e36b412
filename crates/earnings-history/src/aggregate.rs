//! Session to Daily Aggregation

use crate::error::HistoryError;
use crate::HistoricalRecord;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// One work session as recorded by the driver app
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub driver_id: String,
    #[serde(with = "session_timestamp")]
    pub timestamp: NaiveDateTime,
    pub earnings: f64,
    #[serde(default)]
    pub hours_worked: f64,
    #[serde(default)]
    pub rides_completed: u32,
    #[serde(default)]
    pub wellness_score: Option<f64>,
}

/// Daily totals for one driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub driver_id: String,
    pub day: NaiveDate,
    pub total_earnings: f64,
    pub hours_worked: f64,
    pub rides_completed: u32,
    /// Number of sessions folded into this day
    pub sessions: usize,
    /// Wellness score of the day's last session
    pub wellness_score: Option<f64>,
}

impl DailySummary {
    /// The day as a history record
    pub fn record(&self) -> HistoricalRecord {
        HistoricalRecord::new(self.day, self.total_earnings)
    }
}

/// Fold sessions into per-driver daily totals, ordered by driver then day.
///
/// Sessions may arrive in any order; within a day they are applied in
/// timestamp order so the last session decides the wellness score.
pub fn aggregate_sessions(sessions: &[SessionRecord]) -> Result<Vec<DailySummary>, HistoryError> {
    for (index, session) in sessions.iter().enumerate() {
        if session.driver_id.trim().is_empty() {
            return Err(HistoryError::malformed(index, "missing driver_id"));
        }
        if !session.earnings.is_finite() {
            return Err(HistoryError::malformed(index, "non-finite earnings"));
        }
    }

    let mut ordered: Vec<&SessionRecord> = sessions.iter().collect();
    ordered.sort_by_key(|s| s.timestamp);

    let mut days: BTreeMap<(String, NaiveDate), DailySummary> = BTreeMap::new();
    for session in ordered {
        let day = session.timestamp.date();
        let summary = days
            .entry((session.driver_id.clone(), day))
            .or_insert_with(|| DailySummary {
                driver_id: session.driver_id.clone(),
                day,
                total_earnings: 0.0,
                hours_worked: 0.0,
                rides_completed: 0,
                sessions: 0,
                wellness_score: None,
            });
        summary.total_earnings += session.earnings;
        summary.hours_worked += session.hours_worked;
        summary.rides_completed = summary.rides_completed.saturating_add(session.rides_completed);
        summary.sessions += 1;
        if session.wellness_score.is_some() {
            summary.wellness_score = session.wellness_score;
        }
    }

    debug!(
        "Aggregated {} sessions into {} driver-days",
        sessions.len(),
        days.len()
    );
    Ok(days.into_values().collect())
}

/// Session timestamps are written as `YYYY-MM-DD HH:MM:SS`; ISO `T` form is also read.
mod session_timestamp {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";
    const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&text, FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(&text, ISO_FORMAT))
            .map_err(de::Error::custom)
    }
}
