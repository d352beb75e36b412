//! Calendar Helpers

use crate::error::FeatureError;
use chrono::{Datelike, NaiveDate};

/// Date format used at every boundary
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date; `field` names the input in the error
pub fn parse_date(field: &str, text: &str) -> Result<NaiveDate, FeatureError> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).map_err(|e| {
        FeatureError::InvalidRange(format!("{} {:?} is not a YYYY-MM-DD date: {}", field, text, e))
    })
}

/// Contiguous daily sequence from `start` to `end` inclusive; empty when `start > end`
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// Number of days in `[start, end]`, zero when `start > end`
pub fn inclusive_day_count(start: NaiveDate, end: NaiveDate) -> usize {
    let days = (end - start).num_days();
    if days < 0 {
        0
    } else {
        days as usize + 1
    }
}

/// Day of week with Monday = 0
pub fn day_of_week(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_monday() as u8
}

/// Saturday and Sunday
pub fn is_weekend(day_of_week: u8) -> bool {
    day_of_week >= 5
}
