//! Normalization of a raw table into the canonical series.

use crate::dates::{parse_datetime, parse_number};
use data_spi::{
    ColumnSelection, ColumnType, DataError, Normalized, RawTable, RawValue, Result, RowWarning,
    Series, TimeSeriesRow, TIMESTAMP_COLUMN, VALUE_COLUMN,
};

/// Conventional column names checked before falling back to inferred types.
const CONVENTIONAL_DATE_COLUMN: &str = "ds";
const CONVENTIONAL_METRIC_COLUMN: &str = "y";

/// Select, rename, coerce and sort the two chosen columns.
///
/// Rows whose timestamp does not parse or whose value is missing or
/// non-numeric are dropped and reported as warnings.
pub fn normalize(table: &RawTable, selection: &ColumnSelection) -> Result<Normalized> {
    if selection.date_column == selection.metric_column {
        return Err(DataError::Schema(format!(
            "date and metric columns must differ (both are '{}')",
            selection.date_column
        )));
    }

    let date_idx = table
        .column_index(&selection.date_column)
        .ok_or_else(|| DataError::missing_column("Date", &selection.date_column))?;
    let metric_idx = table
        .column_index(&selection.metric_column)
        .ok_or_else(|| DataError::missing_column("Metric", &selection.metric_column))?;

    if table.column_types()[metric_idx] == ColumnType::DateTime {
        return Err(DataError::Schema(format!(
            "Metric column '{}' holds dates, not numbers",
            selection.metric_column
        )));
    }

    let mut rows = Vec::with_capacity(table.len());
    let mut warnings = Vec::new();
    let mut any_timestamp = false;
    let mut any_value = false;

    for (i, record) in table.records().iter().enumerate() {
        let row = i + 1;
        let date_cell = record.get(date_idx).unwrap_or(&RawValue::Empty);
        let metric_cell = record.get(metric_idx).unwrap_or(&RawValue::Empty);

        let timestamp = coerce_timestamp(date_cell);
        let value = coerce_value(metric_cell);
        any_timestamp |= timestamp.is_some();
        any_value |= value.is_some();

        match (timestamp, value) {
            (Some(timestamp), Some(value)) => rows.push(TimeSeriesRow::new(timestamp, value)),
            (None, _) => warnings.push(RowWarning {
                row,
                column: selection.date_column.clone(),
                raw: date_cell.to_string(),
                reason: if date_cell.is_empty() {
                    "missing date".to_string()
                } else {
                    "unparsable date".to_string()
                },
            }),
            (Some(_), None) => warnings.push(RowWarning {
                row,
                column: selection.metric_column.clone(),
                raw: metric_cell.to_string(),
                reason: if metric_cell.is_empty() {
                    "missing value".to_string()
                } else {
                    "non-numeric value".to_string()
                },
            }),
        }
    }

    if !any_timestamp {
        return Err(DataError::Schema(format!(
            "Date column '{}' contains no parsable dates",
            selection.date_column
        )));
    }
    if !any_value {
        return Err(DataError::Schema(format!(
            "Metric column '{}' contains no numeric values",
            selection.metric_column
        )));
    }

    if !warnings.is_empty() {
        tracing::warn!(
            dropped = warnings.len(),
            kept = rows.len(),
            "dropped rows during normalization"
        );
        for w in &warnings {
            tracing::debug!(row = w.row, column = %w.column, raw = %w.raw, "{}", w.reason);
        }
    }

    let renamed = format!(
        "The selected date column '{}' is now labeled as '{}' and the values column '{}' as '{}'",
        selection.date_column, TIMESTAMP_COLUMN, selection.metric_column, VALUE_COLUMN
    );

    Ok(Normalized {
        series: Series::new(rows),
        warnings,
        renamed,
    })
}

/// Guess the date and metric columns of a freshly uploaded table.
///
/// Columns named `ds` and `y` win; otherwise the first date column and the
/// first numeric column after it is excluded.
pub fn detect_columns(table: &RawTable) -> Option<ColumnSelection> {
    if table.column_index(CONVENTIONAL_DATE_COLUMN).is_some()
        && table.column_index(CONVENTIONAL_METRIC_COLUMN).is_some()
    {
        return Some(ColumnSelection::new(
            CONVENTIONAL_DATE_COLUMN,
            CONVENTIONAL_METRIC_COLUMN,
        ));
    }

    let headers = table.headers();
    let types = table.column_types();
    let date = headers
        .iter()
        .zip(types)
        .find(|(_, t)| **t == ColumnType::DateTime)
        .map(|(h, _)| h)?;
    let metric = headers
        .iter()
        .zip(types)
        .find(|(h, t)| **t == ColumnType::Number && *h != date)
        .map(|(h, _)| h)?;

    Some(ColumnSelection::new(date.clone(), metric.clone()))
}

fn coerce_timestamp(cell: &RawValue) -> Option<chrono::NaiveDateTime> {
    match cell {
        RawValue::DateTime(dt) => Some(*dt),
        RawValue::Text(s) => parse_datetime(s),
        RawValue::Number(n) => parse_datetime(&n.to_string()),
        RawValue::Empty => None,
    }
}

fn coerce_value(cell: &RawValue) -> Option<f64> {
    match cell {
        RawValue::Number(n) => Some(*n),
        RawValue::Text(s) => parse_number(s),
        RawValue::DateTime(_) | RawValue::Empty => None,
    }
}
