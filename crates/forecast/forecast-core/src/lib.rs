//! Forecast Core
//!
//! Additive forecasting model: piecewise-linear trend plus Fourier
//! seasonalities, fitted by penalized least squares, with deterministic
//! uncertainty bands. Also provides frequency inference, seasonality
//! detection and interval computation used by the model.

pub mod additive;
pub mod confidence;
pub mod config;
pub mod frequency;
pub mod seasonality;
pub mod solver;
pub mod trend;

// Re-export SPI traits for implementations
pub use forecast_spi::{
    Component, ConfidenceInterval, ConfidenceIntervalComputer, ForecastError, Forecaster,
    Frequency, Prediction, Result, SeasonalProfile, SeasonalityDetector, SeasonalitySpec,
};

// Re-export main types
pub use additive::AdditiveModel;
pub use confidence::{z_score, ForecastWithConfidence, NormalIntervalComputer};
pub use config::{ModelConfig, SeasonalityToggle};
pub use frequency::{future_only, future_timeline, infer_frequency};
pub use seasonality::{fourier_series, AutoSeasonality};
