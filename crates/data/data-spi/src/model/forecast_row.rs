//! Forecast output row.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One forecast period with its 80% uncertainty band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub timestamp: NaiveDateTime,
    /// Point forecast
    pub predicted: f64,
    /// Lower bound of the uncertainty band
    pub lower: f64,
    /// Upper bound of the uncertainty band
    pub upper: f64,
}

impl ForecastRow {
    pub fn new(timestamp: NaiveDateTime, predicted: f64, lower: f64, upper: f64) -> Self {
        Self {
            timestamp,
            predicted,
            lower,
            upper,
        }
    }

    /// Width of the uncertainty band
    pub fn band_width(&self) -> f64 {
        self.upper - self.lower
    }
}
