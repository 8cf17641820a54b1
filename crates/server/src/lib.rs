//! # server
//!
//! Web front end for the forecasting pipeline: upload a CSV, pick the date
//! and metric columns and a horizon, view the forecast table and charts and
//! download the forecast. A JSON endpoint runs the same pipeline in one
//! request.

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use forecast_facade::{AdditiveModel, ForecastError, Forecaster};
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod views;

pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ErrorResponse};
pub use state::{AppState, SessionStore};

/// Liveness probe - is the server running?
async fn liveness() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe - can the server fit a model?
async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let started = Instant::now();
    let model = check_model();
    let sessions = state.sessions.len().await;
    let healthy = model.is_ok();
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = serde_json::json!({
        "status": if healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "duration_ms": started.elapsed().as_millis() as u64,
        "sessions": sessions,
        "checks": [
            { "name": "server", "status": "healthy", "message": null },
            {
                "name": "model",
                "status": if healthy { "healthy" } else { "unhealthy" },
                "message": model.err().map(|e| e.to_string())
            }
        ]
    });
    (status, Json(body))
}

/// Fit a tiny daily series
fn check_model() -> Result<(), ForecastError> {
    let epoch = chrono::DateTime::<chrono::Utc>::UNIX_EPOCH.naive_utc();
    let timestamps: Vec<_> = (0..3).map(|i| epoch + chrono::Duration::days(i)).collect();
    let mut model = AdditiveModel::new();
    model.fit(&timestamps, &[1.0, 2.0, 3.0])?;
    model.predict(&timestamps).map(|_| ())
}

/// Build the router with middleware
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        // Page and form endpoints
        .route("/", get(routes::index))
        .route("/upload", post(routes::upload))
        .route("/forecast", post(routes::forecast))
        .route("/download", get(routes::download))
        // Health endpoints (Kubernetes-compatible)
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness))
        .route("/health", get(liveness))
        // API endpoints
        .route("/api/v1/forecast", post(routes::api_forecast))
        // Middleware layers
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
