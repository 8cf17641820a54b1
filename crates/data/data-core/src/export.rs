//! CSV export of forecast tables.

use crate::dates::format_timestamp;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::NaiveTime;
use data_spi::{DataError, ForecastRow, Result};

/// Header row of exported files.
pub const EXPORT_HEADER: [&str; 4] = ["timestamp", "predicted", "lower", "upper"];

/// Suggested file name for downloads.
pub const EXPORT_FILE_NAME: &str = "forecast.csv";

/// Serialize forecast rows to CSV.
///
/// Timestamps are written as plain dates when every row falls on midnight.
/// Floats use the shortest representation that parses back to the same value.
pub fn export_csv(rows: &[ForecastRow]) -> Result<String> {
    let date_only = rows.iter().all(|r| r.timestamp.time() == NaiveTime::MIN);

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(EXPORT_HEADER)
        .map_err(|e| DataError::Export(e.to_string()))?;

    for row in rows {
        writer
            .write_record([
                format_timestamp(row.timestamp, date_only),
                row.predicted.to_string(),
                row.lower.to_string(),
                row.upper.to_string(),
            ])
            .map_err(|e| DataError::Export(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DataError::Export(e.to_string()))?;
    let csv = String::from_utf8(bytes).map_err(|e| DataError::Export(e.to_string()))?;

    tracing::info!(rows = rows.len(), bytes = csv.len(), "exported forecast");
    Ok(csv)
}

/// Encode CSV text as a `data:` URI for an in-page download link.
pub fn data_uri(csv: &str) -> String {
    format!("data:text/csv;base64,{}", STANDARD.encode(csv.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(d: u32, h: u32, predicted: f64) -> ForecastRow {
        let ts = NaiveDate::from_ymd_opt(2021, 4, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap();
        ForecastRow::new(ts, predicted, predicted - 1.0, predicted + 1.0)
    }

    #[test]
    fn test_export_daily_rows() {
        let csv = export_csv(&[row(11, 0, 10.5), row(12, 0, 11.25)]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "timestamp,predicted,lower,upper");
        assert_eq!(lines[1], "2021-04-11,10.5,9.5,11.5");
        assert_eq!(lines[2], "2021-04-12,11.25,10.25,12.25");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_export_intraday_rows_keep_time() {
        let csv = export_csv(&[row(11, 0, 1.0), row(11, 6, 2.0)]).unwrap();
        assert!(csv.contains("2021-04-11 00:00:00,1,0,2"));
        assert!(csv.contains("2021-04-11 06:00:00,2,1,3"));
    }

    #[test]
    fn test_export_empty_table_has_header() {
        let csv = export_csv(&[]).unwrap();
        assert_eq!(csv, "timestamp,predicted,lower,upper\n");
    }

    #[test]
    fn test_export_is_lossless() {
        let value = 0.1 + 0.2;
        let csv = export_csv(&[row(11, 0, value)]).unwrap();
        let written = csv.lines().nth(1).unwrap().split(',').nth(1).unwrap();
        assert_eq!(written.parse::<f64>().unwrap(), value);
    }

    #[test]
    fn test_data_uri() {
        assert_eq!(data_uri("a,b\n"), "data:text/csv;base64,YSxiCg==");
    }
}
