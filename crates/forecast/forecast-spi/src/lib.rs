//! Forecast Service Provider Interface
//!
//! Defines the forecasting engine contract, seasonality detection, interval
//! computation and the model types exchanged between them.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{ConfidenceIntervalComputer, Forecaster, SeasonalityDetector};
pub use error::{ForecastError, Result};
pub use model::{
    end_of_month, is_month_end, Component, ConfidenceInterval, Frequency, Prediction,
    SeasonalProfile, SeasonalitySpec,
};
