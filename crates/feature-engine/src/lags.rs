//! Lag Lookup over an Irregular Daily Series

use chrono::{Days, NaiveDate};
use earnings_history::HistoricalRecord;

/// Deepest lag produced (`lag_1` .. `lag_14`)
pub const MAX_LAG: usize = 14;

/// Point-in-time lookup over day-sorted history
pub struct LagIndex<'a> {
    records: &'a [HistoricalRecord],
}

impl<'a> LagIndex<'a> {
    /// Wrap records already sorted ascending by day
    pub fn new(sorted: &'a [HistoricalRecord]) -> Self {
        debug_assert!(sorted.windows(2).all(|w| w[0].day <= w[1].day));
        Self { records: sorted }
    }

    /// Most recent earnings at or before `day`.
    ///
    /// Days before the first record have no value. Among records sharing a
    /// day, the last one in sort order wins.
    pub fn value_at_or_before(&self, day: NaiveDate) -> Option<f64> {
        let first = self.records.first()?;
        if day < first.day {
            return None;
        }
        let upto = self.records.partition_point(|r| r.day <= day);
        upto.checked_sub(1).map(|i| self.records[i].total_earnings)
    }

    /// `lag_1` .. `lag_14` for a target date
    pub fn lags(&self, date: NaiveDate) -> [Option<f64>; MAX_LAG] {
        let mut lags = [None; MAX_LAG];
        for (i, slot) in lags.iter_mut().enumerate() {
            let lag = (i + 1) as u64;
            *slot = date
                .checked_sub_days(Days::new(lag))
                .and_then(|lag_day| self.value_at_or_before(lag_day));
        }
        lags
    }
}
