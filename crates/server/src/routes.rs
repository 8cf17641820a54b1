//! Route handlers
//!
//! The HTML routes act on the caller's session and redirect back to the
//! page, which shows any step failure inline. The JSON API runs a fresh
//! session per request.

use crate::error::ApiError;
use crate::state::AppState;
use crate::views;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use data_facade::{ColumnSelection, ForecastHorizon, ForecastRow, RowWarning, EXPORT_FILE_NAME};
use pipeline_facade::{PipelineError, Session};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the cookie carrying the session id
pub const SESSION_COOKIE: &str = "forecast_session";

/// Multipart field holding the uploaded file
const FILE_FIELD: &str = "file";

/// Fields are kept as text so that a missing or malformed value reaches
/// the session and is shown on the page
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ForecastForm {
    pub date_column: String,
    pub metric_column: String,
    pub horizon: String,
}

#[derive(Debug, Deserialize)]
pub struct ForecastRequest {
    /// Delimited text, header row first
    pub csv: String,
    /// Detected from the header when omitted
    #[serde(default)]
    pub date_column: Option<String>,
    #[serde(default)]
    pub metric_column: Option<String>,
    pub horizon: i64,
}

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub renamed: String,
    pub warnings: Vec<RowWarning>,
    pub frequency: String,
    pub forecast: Vec<ForecastRow>,
}

/// Session id from the request cookies, if any
pub fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

fn with_cookie(id: Uuid, created: bool, response: impl IntoResponse) -> Response {
    let mut response = response.into_response();
    if created {
        let cookie = format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax");
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}

/// The page for the caller's session
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let (id, session, created) = state.sessions.get_or_create(session_id(&headers)).await;
    let session = session.lock().await;
    let html = views::page(&session, state.config.preview_rows);
    with_cookie(id, created, Html(html))
}

/// Accept a file from the upload form
pub async fn upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut file = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let name = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        let bytes = field.bytes().await?;
        file = Some((name, bytes));
        break;
    }

    let (id, session, created) = state.sessions.get_or_create(session_id(&headers)).await;
    let mut session = session.lock().await;
    match file {
        Some((name, bytes)) => {
            let _ = session.upload(name, &bytes);
        }
        None => session.report(PipelineError::Ingestion("no file was provided".to_string())),
    }
    Ok(with_cookie(id, created, Redirect::to("/")))
}

/// Run the pipeline with the submitted columns and horizon
pub async fn forecast(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ForecastForm>,
) -> Response {
    let (id, session, created) = state.sessions.get_or_create(session_id(&headers)).await;
    let mut session = session.lock().await;
    let selection = ColumnSelection::new(form.date_column, form.metric_column);
    let _ = session.run_text(selection, &form.horizon);
    with_cookie(id, created, Redirect::to("/"))
}

/// The current forecast as a CSV attachment
pub async fn download(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let session = match session_id(&headers) {
        Some(id) => state.sessions.get(id).await,
        None => None,
    }
    .ok_or(PipelineError::NotReady("export"))?;

    let csv = session.lock().await.export()?;
    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
        ),
    ];
    Ok((headers, csv).into_response())
}

/// Forecast a CSV posted as JSON
pub async fn api_forecast(
    payload: Result<Json<ForecastRequest>, JsonRejection>,
) -> Result<Json<ForecastResponse>, ApiError> {
    let Json(req) = payload?;
    let horizon = ForecastHorizon::new(req.horizon).map_err(PipelineError::from)?;

    let mut session = Session::new();
    session.upload(None, req.csv.as_bytes())?;
    let selection = resolve_selection(&session, req.date_column, req.metric_column)?;
    let normalized = session.normalize(selection)?;
    session.fit()?;
    let output = session.forecast(horizon)?;

    Ok(Json(ForecastResponse {
        renamed: normalized.renamed.clone(),
        warnings: normalized.warnings.clone(),
        frequency: output.frequency.to_string(),
        forecast: output.rows.clone(),
    }))
}

/// Fill omitted columns from the ones detected at upload
fn resolve_selection(
    session: &Session,
    date_column: Option<String>,
    metric_column: Option<String>,
) -> Result<ColumnSelection, PipelineError> {
    let suggested = session.upload_info().and_then(|u| u.suggested.as_ref());
    let date_column = date_column
        .or_else(|| suggested.map(|s| s.date_column.clone()))
        .ok_or_else(|| PipelineError::Schema("no date column given and none detected".to_string()))?;
    let metric_column = metric_column
        .or_else(|| suggested.map(|s| s.metric_column.clone()))
        .ok_or_else(|| {
            PipelineError::Schema("no metric column given and none detected".to_string())
        })?;
    Ok(ColumnSelection::new(date_column, metric_column))
}
