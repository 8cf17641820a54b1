//! Output of a forecast run.

use chrono::NaiveDateTime;
use data_spi::{ForecastHorizon, ForecastRow};
use forecast_spi::{Frequency, Prediction, SeasonalProfile};

/// Everything produced by one forecast: the future-only table plus the full
/// prediction and seasonal profiles the charts are drawn from.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastOutput {
    pub horizon: ForecastHorizon,
    /// Last observed timestamp; every row lies strictly after it
    pub last_observed: NaiveDateTime,
    pub frequency: Frequency,
    /// Future-only forecast table
    pub rows: Vec<ForecastRow>,
    /// Prediction over history and future
    pub prediction: Prediction,
    pub profiles: Vec<SeasonalProfile>,
}

impl ForecastOutput {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
