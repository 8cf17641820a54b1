//! HTTP error responses

use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pipeline_facade::{ErrorKind, PipelineError};
use serde::Serialize;
use thiserror::Error;

/// Body of every JSON error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// The JSON body could not be read
    #[error("{}", .0.body_text())]
    Json(#[from] JsonRejection),

    /// The multipart body could not be read
    #[error("{}", .0.body_text())]
    Multipart(#[from] MultipartError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Pipeline(err) => status_for(err.kind()),
            ApiError::Json(rejection) => rejection.status(),
            ApiError::Multipart(err) => err.status(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::Pipeline(err) => err.kind().as_str(),
            ApiError::Json(_) | ApiError::Multipart(_) => "bad_request",
        }
    }
}

/// Status code reported for each error kind
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Ingestion => StatusCode::BAD_REQUEST,
        ErrorKind::Schema
        | ErrorKind::InsufficientData
        | ErrorKind::InvalidHorizon
        | ErrorKind::Model => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::NotReady => StatusCode::CONFLICT,
        ErrorKind::Render => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: self.to_string(),
            kind: self.kind().to_string(),
        };
        (status, Json(body)).into_response()
    }
}
