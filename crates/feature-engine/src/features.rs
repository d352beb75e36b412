//! Forecast Feature Table Assembly

use crate::calendar::{date_range, day_of_week, is_weekend, DATE_FORMAT};
use crate::error::FeatureError;
use crate::lags::{LagIndex, MAX_LAG};
use crate::statistics::RollingStats;
use chrono::NaiveDate;
use earnings_history::HistoricalRecord;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

/// Row index column
pub const INDEX_COLUMN: &str = "timestamp";
/// Target column, left unset for the model to fill
pub const TARGET_COLUMN: &str = "earnings";

/// Lag column names, `lag_k` at position `k - 1`
pub const LAG_COLUMNS: [&str; MAX_LAG] = [
    "lag_1", "lag_2", "lag_3", "lag_4", "lag_5", "lag_6", "lag_7", "lag_8", "lag_9", "lag_10",
    "lag_11", "lag_12", "lag_13", "lag_14",
];

/// Every column of the feature table, in table order
pub const COLUMNS: [&str; 22] = [
    "timestamp",
    "day_of_week",
    "is_weekend",
    "wellness_score",
    "earnings",
    "rolling_mean_7",
    "rolling_std_7",
    "rolling_mean_14",
    "lag_1", "lag_2", "lag_3", "lag_4", "lag_5", "lag_6", "lag_7", "lag_8", "lag_9", "lag_10",
    "lag_11", "lag_12", "lag_13", "lag_14",
];

/// Number of model inputs
pub const FEATURE_DIMENSION: usize = 20;

/// Model inputs: the table columns minus the index and the target.
/// Pre-trained models expect exactly these names in exactly this order.
pub const FEATURE_COLUMNS: [&str; FEATURE_DIMENSION] = [
    "day_of_week",
    "is_weekend",
    "wellness_score",
    "rolling_mean_7",
    "rolling_std_7",
    "rolling_mean_14",
    "lag_1", "lag_2", "lag_3", "lag_4", "lag_5", "lag_6", "lag_7", "lag_8", "lag_9", "lag_10",
    "lag_11", "lag_12", "lag_13", "lag_14",
];

/// One forecast day
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRow {
    pub timestamp: NaiveDate,
    /// Monday = 0
    pub day_of_week: u8,
    pub is_weekend: bool,
    /// Caller context, identical on every row
    pub wellness_score: f64,
    /// Placeholder for the predicted value; never set here
    pub earnings: Option<f64>,
    pub rolling_mean_7: Option<f64>,
    pub rolling_std_7: Option<f64>,
    pub rolling_mean_14: Option<f64>,
    /// `lag_1` .. `lag_14`
    pub lags: [Option<f64>; MAX_LAG],
}

impl ForecastRow {
    /// Value of `lag_k`; `None` when unset or `k` is outside 1..=14
    pub fn lag(&self, k: usize) -> Option<f64> {
        k.checked_sub(1).and_then(|i| self.lags.get(i).copied().flatten())
    }

    /// Model inputs in `FEATURE_COLUMNS` order
    pub fn feature_values(&self) -> Vec<Option<f64>> {
        let mut values = Vec::with_capacity(FEATURE_DIMENSION);
        values.push(Some(self.day_of_week as f64));
        values.push(Some(if self.is_weekend { 1.0 } else { 0.0 }));
        values.push(Some(self.wellness_score));
        values.push(self.rolling_mean_7);
        values.push(self.rolling_std_7);
        values.push(self.rolling_mean_14);
        values.extend_from_slice(&self.lags);
        values
    }
}

impl Serialize for ForecastRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(COLUMNS.len()))?;
        map.serialize_entry(INDEX_COLUMN, &self.timestamp.format(DATE_FORMAT).to_string())?;
        map.serialize_entry("day_of_week", &self.day_of_week)?;
        map.serialize_entry("is_weekend", &self.is_weekend)?;
        map.serialize_entry("wellness_score", &self.wellness_score)?;
        map.serialize_entry(TARGET_COLUMN, &self.earnings)?;
        map.serialize_entry("rolling_mean_7", &self.rolling_mean_7)?;
        map.serialize_entry("rolling_std_7", &self.rolling_std_7)?;
        map.serialize_entry("rolling_mean_14", &self.rolling_mean_14)?;
        for (name, value) in LAG_COLUMNS.iter().zip(self.lags.iter()) {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Stateless feature generator.
///
/// Every row is built from the same history snapshot; predictions are never
/// fed back into the history.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureGenerator;

impl FeatureGenerator {
    /// Create a new generator
    pub fn new() -> Self {
        Self
    }

    /// Build one row per day in `[start, end]`, ascending.
    ///
    /// `history` may be empty or unsorted; it is not modified. Too little
    /// history leaves the affected fields unset rather than failing.
    pub fn generate(
        &self,
        history: &[HistoricalRecord],
        start: NaiveDate,
        end: NaiveDate,
        wellness_score: f64,
    ) -> Result<Vec<ForecastRow>, FeatureError> {
        if start > end {
            return Err(FeatureError::InvalidRange(format!(
                "start {} is after end {}",
                start, end
            )));
        }
        if let Some(index) = history.iter().position(|r| !r.total_earnings.is_finite()) {
            return Err(FeatureError::MalformedHistory {
                index,
                reason: format!("non-finite total_earnings {}", history[index].total_earnings),
            });
        }

        // Stable sort: records sharing a day keep their input order
        let mut sorted = history.to_vec();
        sorted.sort_by_key(|r| r.day);

        let earnings: Vec<f64> = sorted.iter().map(|r| r.total_earnings).collect();
        let rolling = RollingStats::from_earnings(&earnings);
        let lag_index = LagIndex::new(&sorted);

        let rows: Vec<ForecastRow> = date_range(start, end)
            .into_iter()
            .map(|timestamp| {
                let dow = day_of_week(timestamp);
                ForecastRow {
                    timestamp,
                    day_of_week: dow,
                    is_weekend: is_weekend(dow),
                    wellness_score,
                    earnings: None,
                    rolling_mean_7: rolling.mean_7,
                    rolling_std_7: rolling.std_7,
                    rolling_mean_14: rolling.mean_14,
                    lags: lag_index.lags(timestamp),
                }
            })
            .collect();

        debug!(
            rows = rows.len(),
            history = sorted.len(),
            short_window = rolling.mean_7.is_some(),
            long_window = rolling.mean_14.is_some(),
            "Generated forecast features {}..{}",
            start,
            end
        );
        Ok(rows)
    }
}

/// Shorthand for `FeatureGenerator::new().generate(..)`
pub fn generate_features(
    history: &[HistoricalRecord],
    start: NaiveDate,
    end: NaiveDate,
    wellness_score: f64,
) -> Result<Vec<ForecastRow>, FeatureError> {
    FeatureGenerator::new().generate(history, start, end, wellness_score)
}
