//! Record Validator for Untrusted History Rows

use crate::error::HistoryError;
use crate::HistoricalRecord;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Accepted day formats, tried in order. Timestamps are truncated to their date.
const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// A history row as it arrives from a dataset, before validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawHistoryRecord {
    #[serde(default)]
    pub driver_id: Option<String>,
    #[serde(default, alias = "date", alias = "timestamp")]
    pub day: Option<String>,
    #[serde(default, alias = "earnings")]
    pub total_earnings: Option<Value>,
    #[serde(default)]
    pub wellness_score: Option<Value>,
}

/// A row that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRecord {
    pub driver_id: Option<String>,
    pub record: HistoricalRecord,
    pub wellness_score: Option<f64>,
}

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Reject rows without a driver id (needed when loading multi-driver datasets)
    pub require_driver_id: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            require_driver_id: false,
        }
    }
}

impl ValidationConfig {
    /// Config for multi-driver datasets
    pub fn dataset() -> Self {
        Self {
            require_driver_id: true,
        }
    }
}

/// Parse a calendar day from `YYYY-MM-DD` or a `YYYY-MM-DD HH:MM:SS` timestamp
pub fn parse_day(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(day) = NaiveDate::parse_from_str(text, DATE_FORMAT) {
        return Some(day);
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|ts| ts.date())
}

/// Validator for raw history rows. The first bad row fails the whole batch.
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a single row; `index` is its position in the batch
    pub fn validate(
        &self,
        index: usize,
        raw: &RawHistoryRecord,
    ) -> Result<ValidatedRecord, HistoryError> {
        let driver_id = raw
            .driver_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        if self.config.require_driver_id && driver_id.is_none() {
            return Err(HistoryError::malformed(index, "missing driver_id"));
        }

        let day_text = raw
            .day
            .as_deref()
            .ok_or_else(|| HistoryError::malformed(index, "missing day"))?;
        let day = parse_day(day_text).ok_or_else(|| {
            HistoryError::malformed(index, format!("unparseable day {:?}", day_text))
        })?;

        let total_earnings = match &raw.total_earnings {
            None | Some(Value::Null) => {
                return Err(HistoryError::malformed(index, "missing total_earnings"))
            }
            Some(value) => Self::numeric_field(index, "total_earnings", value)?,
        };

        let wellness_score = match &raw.wellness_score {
            None | Some(Value::Null) => None,
            Some(value) => Some(Self::numeric_field(index, "wellness_score", value)?),
        };

        Ok(ValidatedRecord {
            driver_id,
            record: HistoricalRecord::new(day, total_earnings),
            wellness_score,
        })
    }

    /// Validate one untyped JSON row. Shape errors (not an object, a field
    /// given twice under different aliases) are reported against `index`.
    pub fn validate_value(
        &self,
        index: usize,
        value: &Value,
    ) -> Result<ValidatedRecord, HistoryError> {
        let raw = RawHistoryRecord::deserialize(value)
            .map_err(|e| HistoryError::malformed(index, e.to_string()))?;
        self.validate(index, &raw)
    }

    /// Validate untyped JSON rows, failing on the first malformed one
    pub fn validate_values(&self, values: &[Value]) -> Result<Vec<ValidatedRecord>, HistoryError> {
        values
            .iter()
            .enumerate()
            .map(|(index, value)| self.validate_value(index, value))
            .collect()
    }

    /// Validate every row, failing on the first malformed one
    pub fn validate_all(
        &self,
        raw: &[RawHistoryRecord],
    ) -> Result<Vec<ValidatedRecord>, HistoryError> {
        raw.iter()
            .enumerate()
            .map(|(index, row)| self.validate(index, row))
            .collect()
    }

    fn numeric_field(index: usize, field: &str, value: &Value) -> Result<f64, HistoryError> {
        let number = match value {
            Value::Number(n) => n.as_f64(),
            // Numbers exported as strings are accepted; anything else is not numeric
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .ok_or_else(|| HistoryError::malformed(index, format!("non-numeric {} {}", field, value)))?;

        if !number.is_finite() {
            return Err(HistoryError::malformed(index, format!("non-finite {}", field)));
        }
        Ok(number)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}
