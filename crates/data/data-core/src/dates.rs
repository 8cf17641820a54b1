//! Cell parsing helpers for dates and numbers.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// Date-time layouts tried in order, most specific first.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts, interpreted as midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Cell spellings treated as missing.
const NA_MARKERS: &[&str] = &["", "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "-"];

/// Whether a cell is one of the missing-value spellings.
pub fn is_missing(cell: &str) -> bool {
    NA_MARKERS.contains(&cell.trim())
}

/// Parse a date or date-time cell.
///
/// Offsets in RFC 3339 values are normalized to UTC. A bare `YYYY-MM`
/// is read as the first day of that month.
pub fn parse_datetime(cell: &str) -> Option<NaiveDateTime> {
    let s = cell.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }

    let bytes = s.as_bytes();
    if bytes.len() == 7 && bytes[4] == b'-' {
        if let Ok(d) = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d") {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }

    None
}

/// Parse a finite number. Missing markers and non-finite values yield `None`.
pub fn parse_number(cell: &str) -> Option<f64> {
    let s = cell.trim();
    if is_missing(s) {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Format a timestamp as a date when `date_only`, else with seconds.
pub fn format_timestamp(ts: NaiveDateTime, date_only: bool) -> String {
    if date_only {
        ts.format("%Y-%m-%d").to_string()
    } else {
        ts.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_time(NaiveTime::MIN)
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_datetime("2021-01-01"), Some(ymd(2021, 1, 1)));
        assert_eq!(parse_datetime(" 2021-04-10 "), Some(ymd(2021, 4, 10)));
    }

    #[test]
    fn test_parse_datetime_with_time() {
        let expected = NaiveDate::from_ymd_opt(2022, 8, 12)
            .unwrap()
            .and_hms_opt(13, 45, 0)
            .unwrap();
        assert_eq!(parse_datetime("2022-08-12 13:45:00"), Some(expected));
        assert_eq!(parse_datetime("2022-08-12T13:45:00"), Some(expected));
        assert_eq!(parse_datetime("2022-08-12 13:45"), Some(expected));
        assert_eq!(parse_datetime("2022-08-12T13:45:00Z"), Some(expected));
        assert_eq!(parse_datetime("2022-08-12T15:45:00+02:00"), Some(expected));
    }

    #[test]
    fn test_parse_alternate_layouts() {
        assert_eq!(parse_datetime("2021/03/05"), Some(ymd(2021, 3, 5)));
        assert_eq!(parse_datetime("03/05/2021"), Some(ymd(2021, 3, 5)));
        assert_eq!(parse_datetime("05.03.2021"), Some(ymd(2021, 3, 5)));
        assert_eq!(parse_datetime("2021-03"), Some(ymd(2021, 3, 1)));
    }

    #[test]
    fn test_parse_rejects_non_dates() {
        assert_eq!(parse_datetime(""), None);
        assert_eq!(parse_datetime("hello"), None);
        assert_eq!(parse_datetime("12.5"), None);
        assert_eq!(parse_datetime("2021"), None);
        assert_eq!(parse_datetime("2021-13-01"), None);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("42"), Some(42.0));
        assert_eq!(parse_number(" -3.5 "), Some(-3.5));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NA"), None);
        assert_eq!(parse_number("abc"), None);
    }

    #[test]
    fn test_format_timestamp() {
        let ts = NaiveDate::from_ymd_opt(2021, 5, 10)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap();
        assert_eq!(format_timestamp(ts, false), "2021-05-10 06:00:00");
        assert_eq!(format_timestamp(ymd(2021, 5, 10), true), "2021-05-10");
    }
}
