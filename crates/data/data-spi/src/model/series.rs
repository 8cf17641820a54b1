//! Canonical two-column time series.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Canonical name of the date column after normalization
pub const TIMESTAMP_COLUMN: &str = "timestamp";
/// Canonical name of the metric column after normalization
pub const VALUE_COLUMN: &str = "value";

/// A single observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesRow {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

impl TimeSeriesRow {
    pub fn new(timestamp: NaiveDateTime, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Observations sorted ascending by timestamp.
///
/// Duplicate timestamps are allowed and keep their input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    rows: Vec<TimeSeriesRow>,
}

impl Series {
    /// Build a series, sorting rows by timestamp.
    pub fn new(mut rows: Vec<TimeSeriesRow>) -> Self {
        rows.sort_by_key(|r| r.timestamp);
        Self { rows }
    }

    pub fn rows(&self) -> &[TimeSeriesRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        self.rows.iter().map(|r| r.timestamp).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.value).collect()
    }

    pub fn first_timestamp(&self) -> Option<NaiveDateTime> {
        self.rows.first().map(|r| r.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.rows.last().map(|r| r.timestamp)
    }
}

/// The two columns the user picked from the uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnSelection {
    pub date_column: String,
    pub metric_column: String,
}

impl ColumnSelection {
    pub fn new(date_column: impl Into<String>, metric_column: impl Into<String>) -> Self {
        Self {
            date_column: date_column.into(),
            metric_column: metric_column.into(),
        }
    }
}

/// A row dropped during normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowWarning {
    /// 1-based data row number (header excluded)
    pub row: usize,
    /// Original column name
    pub column: String,
    /// Cell text as uploaded
    pub raw: String,
    pub reason: String,
}

impl std::fmt::Display for RowWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "row {} dropped: {} '{}' in column '{}'",
            self.row, self.reason, self.raw, self.column
        )
    }
}

/// Output of normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Normalized {
    pub series: Series,
    pub warnings: Vec<RowWarning>,
    /// User-facing announcement of the applied renaming
    pub renamed: String,
}
