//! Rolling Window Statistics

/// Short rolling window (records)
pub const SHORT_WINDOW: usize = 7;
/// Long rolling window (records)
pub const LONG_WINDOW: usize = 14;

/// Mean and population standard deviation of a window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    pub mean: f64,
    pub std_dev: f64,
}

impl WindowStats {
    /// Compute statistics over a slice; `None` for an empty slice
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;

        let m2: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
        // Population variance (divide by n, not n - 1)
        let std_dev = (m2 / n).sqrt();

        Some(Self { mean, std_dev })
    }

    /// Statistics over the last `size` values, or `None` if fewer are available
    pub fn tail(values: &[f64], size: usize) -> Option<Self> {
        if size == 0 || values.len() < size {
            return None;
        }
        Self::compute(&values[values.len() - size..])
    }
}

/// Rolling features shared by every row of one forecast
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RollingStats {
    pub mean_7: Option<f64>,
    pub std_7: Option<f64>,
    pub mean_14: Option<f64>,
}

impl RollingStats {
    /// Compute from day-ordered earnings; windows anchor at the last record
    pub fn from_earnings(earnings: &[f64]) -> Self {
        let short = WindowStats::tail(earnings, SHORT_WINDOW);
        let long = WindowStats::tail(earnings, LONG_WINDOW);
        Self {
            mean_7: short.map(|s| s.mean),
            std_7: short.map(|s| s.std_dev),
            mean_14: long.map(|s| s.mean),
        }
    }
}
