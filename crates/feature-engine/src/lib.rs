//! Forecast Feature Engine
//!
//! Turns a driver's earnings history into one feature row per forecast day:
//! calendar indicators, lag features and rolling-window statistics.

mod calendar;
mod error;
mod features;
mod lags;
mod statistics;

pub use calendar::{date_range, day_of_week, inclusive_day_count, is_weekend, parse_date, DATE_FORMAT};
pub use error::FeatureError;
pub use features::{
    generate_features, FeatureGenerator, ForecastRow, COLUMNS, FEATURE_COLUMNS, FEATURE_DIMENSION,
    INDEX_COLUMN, LAG_COLUMNS, TARGET_COLUMN,
};
pub use lags::{LagIndex, MAX_LAG};
pub use statistics::{RollingStats, WindowStats, LONG_WINDOW, SHORT_WINDOW};

pub use earnings_history::HistoricalRecord;
