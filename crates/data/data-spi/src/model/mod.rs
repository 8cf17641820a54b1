//! Data models for uploaded and forecast time series.

mod forecast_row;
mod horizon;
mod raw;
mod series;

pub use forecast_row::ForecastRow;
pub use horizon::ForecastHorizon;
pub use raw::{ColumnType, RawRecord, RawTable, RawValue};
pub use series::{
    ColumnSelection, Normalized, RowWarning, Series, TimeSeriesRow, TIMESTAMP_COLUMN,
    VALUE_COLUMN,
};
