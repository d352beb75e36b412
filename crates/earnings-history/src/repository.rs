//! Repository Implementation

use crate::aggregate::{aggregate_sessions, SessionRecord};
use crate::error::HistoryError;
use crate::validator::{ValidationConfig, Validator};
use crate::HistoricalRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;
use tracing::{debug, info};

/// A driver's validated history, kept in ascending day order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DriverHistory {
    driver_id: String,
    records: Vec<HistoricalRecord>,
    /// (day, score) of the most recent record carrying a wellness score
    latest_wellness: Option<(NaiveDate, f64)>,
}

impl DriverHistory {
    /// Create an empty history
    pub fn new(driver_id: impl Into<String>) -> Self {
        Self {
            driver_id: driver_id.into(),
            records: Vec::new(),
            latest_wellness: None,
        }
    }

    /// Add a record. Records sharing a day keep their insertion order.
    pub fn push(&mut self, record: HistoricalRecord, wellness_score: Option<f64>) {
        let pos = self.records.partition_point(|r| r.day <= record.day);
        self.records.insert(pos, record);

        if let Some(score) = wellness_score {
            let newer = self
                .latest_wellness
                .map_or(true, |(day, _)| record.day >= day);
            if newer {
                self.latest_wellness = Some((record.day, score));
            }
        }
    }

    pub fn driver_id(&self) -> &str {
        &self.driver_id
    }

    /// Records in ascending day order
    pub fn records(&self) -> &[HistoricalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Wellness score recorded on the latest day that has one
    pub fn latest_wellness(&self) -> Option<f64> {
        self.latest_wellness.map(|(_, score)| score)
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.day)
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.day)
    }
}

/// Accepted shapes of a history dataset file
#[derive(Deserialize)]
#[serde(untagged)]
enum HistoryDocument {
    List(Vec<Value>),
    Wrapped { records: Vec<Value> },
}

/// In-memory repository of driver histories
pub struct HistoryRepository {
    drivers: RwLock<HashMap<String, DriverHistory>>,
}

impl HistoryRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        info!("Creating in-memory history repository");
        Self {
            drivers: RwLock::new(HashMap::new()),
        }
    }

    /// Build a repository from a JSON dataset: an array of records or `{"records": [...]}`
    pub fn from_json_str(text: &str) -> Result<Self, HistoryError> {
        let raw = match serde_json::from_str::<HistoryDocument>(text)? {
            HistoryDocument::List(records) | HistoryDocument::Wrapped { records } => records,
        };
        let validated = Validator::new(ValidationConfig::dataset()).validate_values(&raw)?;

        let repo = Self::new();
        {
            let mut drivers = repo.write()?;
            for row in validated {
                // driver_id is guaranteed by the dataset config
                let driver_id = row.driver_id.unwrap_or_default();
                drivers
                    .entry(driver_id.clone())
                    .or_insert_with(|| DriverHistory::new(driver_id))
                    .push(row.record, row.wellness_score);
            }
        }
        info!(
            "Loaded {} records for {} drivers",
            repo.record_count()?,
            repo.driver_count()?
        );
        Ok(repo)
    }

    /// Load a JSON dataset of daily records from disk
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, HistoryError> {
        let path = path.as_ref();
        debug!("Reading history dataset from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Build a repository from work sessions, aggregated to daily totals
    pub fn from_sessions(sessions: &[SessionRecord]) -> Result<Self, HistoryError> {
        let days = aggregate_sessions(sessions)?;
        let repo = Self::new();
        {
            let mut drivers = repo.write()?;
            for summary in days {
                drivers
                    .entry(summary.driver_id.clone())
                    .or_insert_with(|| DriverHistory::new(summary.driver_id.clone()))
                    .push(summary.record(), summary.wellness_score);
            }
        }
        info!(
            "Loaded {} sessions as {} daily records for {} drivers",
            sessions.len(),
            repo.record_count()?,
            repo.driver_count()?
        );
        Ok(repo)
    }

    /// Load a JSON array of work sessions from disk
    pub fn load_sessions_json(path: impl AsRef<Path>) -> Result<Self, HistoryError> {
        let path = path.as_ref();
        debug!("Reading session dataset from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        let sessions: Vec<SessionRecord> = serde_json::from_str(&text)?;
        Self::from_sessions(&sessions)
    }

    /// Insert one record for a driver
    pub fn insert(
        &self,
        driver_id: &str,
        record: HistoricalRecord,
        wellness_score: Option<f64>,
    ) -> Result<(), HistoryError> {
        if !record.total_earnings.is_finite() {
            return Err(HistoryError::malformed(0, "non-finite total_earnings"));
        }
        let mut drivers = self.write()?;
        drivers
            .entry(driver_id.to_string())
            .or_insert_with(|| DriverHistory::new(driver_id))
            .push(record, wellness_score);
        Ok(())
    }

    /// Insert a batch of records for a driver; nothing is inserted if any record is unusable
    pub fn insert_records(
        &self,
        driver_id: &str,
        records: &[HistoricalRecord],
    ) -> Result<(), HistoryError> {
        if let Some(index) = records.iter().position(|r| !r.total_earnings.is_finite()) {
            return Err(HistoryError::malformed(index, "non-finite total_earnings"));
        }
        let mut drivers = self.write()?;
        let history = drivers
            .entry(driver_id.to_string())
            .or_insert_with(|| DriverHistory::new(driver_id));
        for record in records {
            history.push(*record, None);
        }
        debug!("Inserted {} records for {}", records.len(), driver_id);
        Ok(())
    }

    /// Snapshot of a driver's history; the lock is released before returning
    pub fn history(&self, driver_id: &str) -> Result<Option<DriverHistory>, HistoryError> {
        Ok(self.read()?.get(driver_id).cloned())
    }

    /// Known driver ids, sorted
    pub fn driver_ids(&self) -> Result<Vec<String>, HistoryError> {
        let mut ids: Vec<String> = self.read()?.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    pub fn driver_count(&self) -> Result<usize, HistoryError> {
        Ok(self.read()?.len())
    }

    /// Total records across all drivers
    pub fn record_count(&self) -> Result<usize, HistoryError> {
        Ok(self.read()?.values().map(DriverHistory::len).sum())
    }

    fn read(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<String, DriverHistory>>, HistoryError> {
        self.drivers
            .read()
            .map_err(|e| HistoryError::Lock(format!("{}", e)))
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<String, DriverHistory>>, HistoryError> {
        self.drivers
            .write()
            .map_err(|e| HistoryError::Lock(format!("{}", e)))
    }
}

impl Default for HistoryRepository {
    fn default() -> Self {
        Self::new()
    }
}
