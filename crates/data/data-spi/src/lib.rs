//! Data Service Provider Interface
//!
//! Defines the data model shared by ingestion, normalization and export:
//! raw uploaded tables, the canonical two-column series, forecast rows and
//! the validated forecast horizon.

pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use error::{DataError, Result};
pub use model::{
    ColumnSelection, ColumnType, ForecastHorizon, ForecastRow, Normalized, RawRecord, RawTable,
    RawValue, RowWarning, Series, TimeSeriesRow, TIMESTAMP_COLUMN, VALUE_COLUMN,
};
