//! Data error types.

use thiserror::Error;

/// Errors raised while reading, reshaping or writing tabular data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    /// The uploaded file could not be parsed as delimited text
    #[error("Could not read the uploaded file: {0}")]
    Ingestion(String),

    /// The selected columns are missing or have the wrong type
    #[error("Invalid column selection: {0}")]
    Schema(String),

    /// Forecast horizon outside the accepted range
    #[error("Horizon must be between {min} and {max} periods, got {value}")]
    InvalidHorizon { value: i64, min: u32, max: u32 },

    /// Horizon text that is not a whole number
    #[error("Horizon must be a whole number of periods, got '{0}'")]
    HorizonNotANumber(String),

    /// Forecast table could not be serialized
    #[error("Export failed: {0}")]
    Export(String),
}

impl DataError {
    /// Shorthand for a missing-column schema error.
    pub fn missing_column(role: &str, column: &str) -> Self {
        DataError::Schema(format!("{} column '{}' not found", role, column))
    }
}

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;
