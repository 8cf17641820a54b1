//! The single-page HTML view of a session

use data_facade::{data_uri, export_csv, ForecastHorizon, EXPORT_FILE_NAME};
use pipeline_facade::{PipelineState, Session};
use presentation::{escape_html, forecast_table, raw_table, warnings_list};
use std::fmt::Write;

/// Horizon pre-filled before the first forecast
pub const DEFAULT_HORIZON: u32 = 30;

const STYLE: &str = "body{font-family:sans-serif;max-width:960px;margin:2em auto;padding:0 1em}\
table{border-collapse:collapse;font-size:0.9em}td,th{border:1px solid #ccc;padding:2px 8px}\
.error{background:#fdecea;border:1px solid #f5c2c0;padding:0.75em;color:#611a15}\
.notice{background:#e8f4fd;padding:0.75em}.scroll{max-height:360px;overflow:auto}";

/// Render the whole page for the session's current state
pub fn page(session: &Session, preview_rows: usize) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\">\
         <title>Time Series Forecast</title><style>{STYLE}</style></head><body>\
         <h1>Time Series Forecast</h1>\
         <p>Upload a CSV with a date column and a numeric column, choose how many \
         periods to forecast and download the result.</p>"
    );

    if let Some(err) = session.last_error() {
        let _ = write!(
            html,
            "<div class=\"error\" data-kind=\"{}\">{}</div>",
            err.kind(),
            escape_html(&err.to_string())
        );
    }

    html.push_str(&upload_section(session, preview_rows));
    if session.state().has_reached(PipelineState::FileUploaded) {
        html.push_str(&selection_section(session));
    }
    html.push_str(&forecast_section(session));
    html.push_str("</body></html>");
    html
}

fn upload_section(session: &Session, preview_rows: usize) -> String {
    let mut html = String::from(
        "<h2>Step 1: Import data</h2>\
         <form action=\"/upload\" method=\"post\" enctype=\"multipart/form-data\">\
         <input type=\"file\" name=\"file\" accept=\".csv,text/csv,text/plain\">\
         <button type=\"submit\">Upload</button></form>",
    );

    if let Some(upload) = session.upload_info() {
        let name = upload.file_name.as_deref().unwrap_or("upload");
        let _ = write!(
            html,
            "<p>{} ({} bytes)</p><div class=\"scroll\">{}</div>",
            escape_html(name),
            upload.size,
            raw_table(&upload.table, preview_rows)
        );
    }
    html
}

fn selection_section(session: &Session) -> String {
    let Some(table) = session.table() else {
        return String::new();
    };
    let selection = session.selection();
    let horizon = session
        .horizon()
        .map(|h| h.get())
        .unwrap_or(DEFAULT_HORIZON);

    let mut html = String::from(
        "<h2>Step 2: Choose columns and horizon</h2>\
         <form action=\"/forecast\" method=\"post\">",
    );
    let date = selection.map(|s| s.date_column.as_str());
    let metric = selection.map(|s| s.metric_column.as_str());
    html.push_str(&column_select("date_column", "Date column", table.headers(), date));
    html.push_str(&column_select("metric_column", "Metric column", table.headers(), metric));
    let _ = write!(
        html,
        "<label>Periods to forecast <input type=\"number\" name=\"horizon\" \
         min=\"{}\" max=\"{}\" step=\"1\" value=\"{}\"></label>\
         <p>Forecasts become less accurate with larger horizons.</p>\
         <button type=\"submit\">Forecast</button></form>",
        ForecastHorizon::MIN,
        ForecastHorizon::MAX,
        horizon
    );

    if let Some(normalized) = session.normalized() {
        let _ = write!(
            html,
            "<p class=\"notice\">{}</p>{}",
            escape_html(&normalized.renamed),
            warnings_list(&normalized.warnings)
        );
    }
    html
}

fn column_select(name: &str, label: &str, headers: &[String], selected: Option<&str>) -> String {
    let mut html = String::new();
    let _ = write!(html, "<label>{label} <select name=\"{name}\">");
    for header in headers {
        let escaped = escape_html(header);
        let marker = if selected == Some(header.as_str()) {
            " selected"
        } else {
            ""
        };
        let _ = write!(html, "<option value=\"{escaped}\"{marker}>{escaped}</option>");
    }
    html.push_str("</select></label> ");
    html
}

fn forecast_section(session: &Session) -> String {
    let Some(output) = session.forecast_output() else {
        return String::new();
    };
    let mut html = String::new();
    let _ = write!(
        html,
        "<h2>Step 3: Forecast</h2>\
         <p>{} {} periods after {}. Lower and upper are the 80% uncertainty interval.</p>\
         <div class=\"scroll\">{}</div>",
        output.len(),
        output.frequency,
        output.last_observed,
        forecast_table(&output.rows)
    );

    if let Some(charts) = session.cached_charts() {
        html.push_str("<h3>Actual (black dots) and predicted (blue line) values</h3>");
        html.push_str(&charts.forecast);
        html.push_str("<h3>Forecast components</h3>");
        for chart in &charts.components {
            let _ = write!(
                html,
                "<figure><figcaption>{}</figcaption>{}</figure>",
                escape_html(&chart.name),
                chart.svg
            );
        }
    }

    html.push_str("<h2>Step 4: Download</h2>");
    match export_csv(&output.rows) {
        Ok(csv) => {
            let _ = write!(
                html,
                "<p><a href=\"{}\" download=\"{name}\">Download {name}</a> \
                 or <a href=\"/download\">fetch it from the server</a></p>",
                data_uri(&csv),
                name = EXPORT_FILE_NAME
            );
        }
        Err(err) => {
            let _ = write!(html, "<div class=\"error\">{}</div>", escape_html(&err.to_string()));
        }
    }
    html
}
