//! HTML table fragments

use data_core::format_timestamp;
use data_spi::{ForecastRow, RawTable, RowWarning};
use std::fmt::Write;

/// Rows shown in the uploaded-table preview
pub const DEFAULT_PREVIEW_ROWS: usize = 50;

/// Most row warnings listed individually
const MAX_LISTED_WARNINGS: usize = 20;

/// Escape text for use inside HTML elements and attribute values
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// The first `limit` rows of an uploaded table, preceded by a row count
pub fn raw_table(table: &RawTable, limit: usize) -> String {
    let shown = table.len().min(limit);
    let mut html = String::new();

    let _ = write!(
        html,
        "<p class=\"row-count\">Showing {} of {} rows</p>",
        shown,
        table.len()
    );
    html.push_str("<table class=\"raw-table\"><thead><tr>");
    for header in table.headers() {
        let _ = write!(html, "<th>{}</th>", escape_html(header));
    }
    html.push_str("</tr></thead><tbody>");

    for record in table.records().iter().take(limit) {
        html.push_str("<tr>");
        for value in record.values() {
            let _ = write!(html, "<td>{}</td>", escape_html(&value.to_string()));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}

/// The future-only forecast table
pub fn forecast_table(rows: &[ForecastRow]) -> String {
    let date_only = rows
        .iter()
        .all(|r| r.timestamp.time() == chrono::NaiveTime::MIN);
    let mut html = String::from(
        "<table class=\"forecast-table\"><thead><tr>\
         <th>timestamp</th><th>predicted</th><th>lower</th><th>upper</th>\
         </tr></thead><tbody>",
    );
    for row in rows {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{:.2}</td><td>{:.2}</td><td>{:.2}</td></tr>",
            format_timestamp(row.timestamp, date_only),
            row.predicted,
            row.lower,
            row.upper
        );
    }
    html.push_str("</tbody></table>");
    html
}

/// Dropped-row warnings as a list; empty when there are none
pub fn warnings_list(warnings: &[RowWarning]) -> String {
    if warnings.is_empty() {
        return String::new();
    }
    let mut html = String::from("<ul class=\"warnings\">");
    for warning in warnings.iter().take(MAX_LISTED_WARNINGS) {
        let _ = write!(html, "<li>{}</li>", escape_html(&warning.to_string()));
    }
    if warnings.len() > MAX_LISTED_WARNINGS {
        let _ = write!(
            html,
            "<li>and {} more</li>",
            warnings.len() - MAX_LISTED_WARNINGS
        );
    }
    html.push_str("</ul>");
    html
}
