//! Pipeline error taxonomy.

use data_spi::DataError;
use forecast_spi::ForecastError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A failed pipeline step. Every lower-level error is folded into one of
/// these before it reaches the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// The uploaded file could not be read
    #[error("Could not read the uploaded file: {0}")]
    Ingestion(String),

    /// Selected columns are missing or unusable
    #[error("Invalid column selection: {0}")]
    Schema(String),

    /// Too few usable rows to fit a model
    #[error("Not enough data to forecast: need at least {required} dated values, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Chart, table or export output could not be produced
    #[error("Could not render output: {0}")]
    Render(String),

    /// Horizon outside the accepted range
    #[error("Horizon must be between {min} and {max} periods, got {value}")]
    InvalidHorizon { value: i64, min: u32, max: u32 },

    #[error("Horizon must be a whole number of periods, got '{0}'")]
    HorizonNotANumber(String),

    /// The forecasting model failed for a reason other than data volume
    #[error("Forecast failed: {0}")]
    Model(String),

    /// A step was requested before the step it depends on
    #[error("Nothing to {0} yet")]
    NotReady(&'static str),
}

/// Machine-readable category of a [`PipelineError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Ingestion,
    Schema,
    InsufficientData,
    Render,
    InvalidHorizon,
    Model,
    NotReady,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Ingestion => "ingestion",
            ErrorKind::Schema => "schema",
            ErrorKind::InsufficientData => "insufficient_data",
            ErrorKind::Render => "render",
            ErrorKind::InvalidHorizon => "invalid_horizon",
            ErrorKind::Model => "model",
            ErrorKind::NotReady => "not_ready",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Ingestion(_) => ErrorKind::Ingestion,
            PipelineError::Schema(_) => ErrorKind::Schema,
            PipelineError::InsufficientData { .. } => ErrorKind::InsufficientData,
            PipelineError::Render(_) => ErrorKind::Render,
            PipelineError::InvalidHorizon { .. } | PipelineError::HorizonNotANumber(_) => {
                ErrorKind::InvalidHorizon
            }
            PipelineError::Model(_) => ErrorKind::Model,
            PipelineError::NotReady(_) => ErrorKind::NotReady,
        }
    }

    /// Whether the error was caused by the user's input rather than the system
    pub fn is_user_error(&self) -> bool {
        !matches!(self, PipelineError::Render(_) | PipelineError::Model(_))
    }
}

impl From<DataError> for PipelineError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::Ingestion(msg) => PipelineError::Ingestion(msg),
            DataError::Schema(msg) => PipelineError::Schema(msg),
            DataError::InvalidHorizon { value, min, max } => {
                PipelineError::InvalidHorizon { value, min, max }
            }
            DataError::HorizonNotANumber(input) => PipelineError::HorizonNotANumber(input),
            DataError::Export(msg) => PipelineError::Render(format!("CSV export: {}", msg)),
        }
    }
}

impl From<ForecastError> for PipelineError {
    fn from(err: ForecastError) -> Self {
        match err {
            ForecastError::InsufficientData { required, actual } => {
                PipelineError::InsufficientData { required, actual }
            }
            other => PipelineError::Model(other.to_string()),
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
