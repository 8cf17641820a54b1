//! Raw uploaded table types.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell from the uploaded file after type coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawValue {
    /// Empty cell
    Empty,
    /// Numeric cell
    Number(f64),
    /// Cell in a date-like column that parsed as a date/time
    DateTime(NaiveDateTime),
    /// Anything else, kept verbatim
    Text(String),
}

impl RawValue {
    /// Numeric view of the cell, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Date/time view of the cell, if any.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            RawValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RawValue::Empty)
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Empty => Ok(()),
            RawValue::Number(n) => write!(f, "{}", n),
            RawValue::DateTime(dt) => {
                if dt.time() == chrono::NaiveTime::MIN {
                    write!(f, "{}", dt.format("%Y-%m-%d"))
                } else {
                    write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S"))
                }
            }
            RawValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Inferred type of an uploaded column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    /// No non-empty cells
    Empty,
    /// Every non-empty cell is numeric
    Number,
    /// Most non-empty cells parse as dates
    DateTime,
    /// Free text
    Text,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColumnType::Empty => "empty",
            ColumnType::Number => "number",
            ColumnType::DateTime => "datetime",
            ColumnType::Text => "text",
        };
        write!(f, "{}", s)
    }
}

/// One data row of the uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    values: Vec<RawValue>,
}

impl RawRecord {
    pub fn new(values: Vec<RawValue>) -> Self {
        Self { values }
    }

    pub fn get(&self, index: usize) -> Option<&RawValue> {
        self.values.get(index)
    }

    pub fn values(&self) -> &[RawValue] {
        &self.values
    }
}

/// The uploaded file as parsed rows with per-column inferred types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    headers: Vec<String>,
    column_types: Vec<ColumnType>,
    records: Vec<RawRecord>,
    delimiter: u8,
}

impl RawTable {
    /// Assemble a table. `column_types` must have one entry per header.
    pub fn new(
        headers: Vec<String>,
        column_types: Vec<ColumnType>,
        records: Vec<RawRecord>,
        delimiter: u8,
    ) -> Self {
        debug_assert_eq!(headers.len(), column_types.len());
        Self {
            headers,
            column_types,
            records,
            delimiter,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn column_types(&self) -> &[ColumnType] {
        &self.column_types
    }

    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    /// Delimiter inferred during ingestion
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.column_index(name).map(|i| self.column_types[i])
    }

    /// Look up a cell by row index and column name.
    pub fn value(&self, row: usize, column: &str) -> Option<&RawValue> {
        let col = self.column_index(column)?;
        self.records.get(row)?.get(col)
    }

    /// Iterate over one column's cells.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &RawValue> + '_> {
        let col = self.column_index(name)?;
        Some(self.records.iter().filter_map(move |r| r.get(col)))
    }
}
