//! Uploaded file ingestion.
//!
//! Parses delimited text with a header row into a [`RawTable`], inferring the
//! delimiter and a type per column. Cells of date-like columns are coerced to
//! date/time values; cells that do not parse stay as text so normalization can
//! report them.

use crate::dates::{is_missing, parse_datetime, parse_number};
use data_spi::{ColumnType, DataError, RawRecord, RawTable, RawValue, Result};
use std::collections::HashSet;

/// Delimiters considered during sniffing, in tie-break order.
const DELIMITER_CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Number of non-empty lines inspected when sniffing.
const SNIFF_LINES: usize = 20;

/// Share of non-empty cells that must parse as dates for a date column.
const DATE_SHARE_THRESHOLD: f64 = 0.8;

/// Parse an uploaded file into a raw table.
pub fn ingest(bytes: &[u8]) -> Result<RawTable> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| DataError::Ingestion(format!("file is not UTF-8 text ({})", e)))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    if text.trim().is_empty() {
        return Err(DataError::Ingestion("file is empty".to_string()));
    }

    let delimiter = sniff_delimiter(text);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DataError::Ingestion(format!("failed to read header row: {}", e)))?
        .iter()
        .map(str::to_string)
        .collect();
    validate_headers(&headers)?;

    let mut cells: Vec<Vec<String>> = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record =
            result.map_err(|e| DataError::Ingestion(format!("row {}: {}", i + 1, e)))?;
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        cells.push(record.iter().map(str::to_string).collect());
    }

    if cells.is_empty() {
        return Err(DataError::Ingestion(
            "no data rows below the header".to_string(),
        ));
    }

    let column_types: Vec<ColumnType> = (0..headers.len())
        .map(|col| infer_column_type(cells.iter().map(|row| row[col].as_str())))
        .collect();

    let records = cells
        .iter()
        .map(|row| {
            RawRecord::new(
                row.iter()
                    .zip(column_types.iter())
                    .map(|(cell, ty)| coerce_cell(cell, *ty))
                    .collect(),
            )
        })
        .collect();

    tracing::info!(
        rows = cells.len(),
        columns = headers.len(),
        delimiter = %(delimiter as char).escape_default(),
        "ingested upload"
    );

    Ok(RawTable::new(headers, column_types, records, delimiter))
}

/// Pick the delimiter that splits every sampled line into the same number
/// of fields. Falls back to `,` when no candidate is consistent.
pub fn sniff_delimiter(text: &str) -> u8 {
    let lines: Vec<&str> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(SNIFF_LINES)
        .collect();

    let mut best: Option<(u8, usize)> = None;
    for &candidate in &DELIMITER_CANDIDATES {
        let mut counts = lines.iter().map(|l| count_fields(l, candidate));
        let first = match counts.next() {
            Some(n) => n,
            None => continue,
        };
        if first < 2 || !counts.all(|n| n == first) {
            continue;
        }
        if best.map_or(true, |(_, fields)| first > fields) {
            best = Some((candidate, first));
        }
    }

    best.map(|(d, _)| d).unwrap_or(b',')
}

/// Field count of a line, ignoring delimiters inside double quotes.
fn count_fields(line: &str, delimiter: u8) -> usize {
    let mut in_quotes = false;
    let mut fields = 1;
    for &b in line.as_bytes() {
        if b == b'"' {
            in_quotes = !in_quotes;
        } else if b == delimiter && !in_quotes {
            fields += 1;
        }
    }
    fields
}

fn validate_headers(headers: &[String]) -> Result<()> {
    let mut seen = HashSet::new();
    for (i, h) in headers.iter().enumerate() {
        if h.is_empty() {
            return Err(DataError::Ingestion(format!(
                "header of column {} is empty",
                i + 1
            )));
        }
        if !seen.insert(h.as_str()) {
            return Err(DataError::Ingestion(format!(
                "duplicate column name '{}'",
                h
            )));
        }
    }
    Ok(())
}

fn infer_column_type<'a>(cells: impl Iterator<Item = &'a str>) -> ColumnType {
    let present: Vec<&str> = cells.filter(|c| !is_missing(c)).collect();
    if present.is_empty() {
        return ColumnType::Empty;
    }
    if present.iter().all(|c| parse_number(c).is_some()) {
        return ColumnType::Number;
    }
    let dates = present
        .iter()
        .filter(|c| parse_datetime(c).is_some())
        .count();
    if dates as f64 >= DATE_SHARE_THRESHOLD * present.len() as f64 {
        ColumnType::DateTime
    } else {
        ColumnType::Text
    }
}

fn coerce_cell(cell: &str, column_type: ColumnType) -> RawValue {
    if is_missing(cell) {
        return RawValue::Empty;
    }
    match column_type {
        ColumnType::Empty => RawValue::Empty,
        ColumnType::DateTime => parse_datetime(cell)
            .map(RawValue::DateTime)
            .unwrap_or_else(|| RawValue::Text(cell.to_string())),
        ColumnType::Number | ColumnType::Text => parse_number(cell)
            .map(RawValue::Number)
            .unwrap_or_else(|| RawValue::Text(cell.to_string())),
    }
}
