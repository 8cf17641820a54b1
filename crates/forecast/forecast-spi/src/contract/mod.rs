//! Contract module containing trait definitions for forecast operations

mod confidence_interval_computer;
mod forecaster;
mod seasonality_detector;

pub use confidence_interval_computer::ConfidenceIntervalComputer;
pub use forecaster::Forecaster;
pub use seasonality_detector::SeasonalityDetector;
