//! Forecast error types

use thiserror::Error;

/// Errors that can occur while fitting or querying a forecaster
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Too few observations to fit
    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Input values the model cannot use
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Invalid parameter value
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Model has not been fitted
    #[error("Model must be fitted before prediction")]
    NotFitted,

    /// Numerical computation error
    #[error("Numerical error: {0}")]
    NumericalError(String),
}
