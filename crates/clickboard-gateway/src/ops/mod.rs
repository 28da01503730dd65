//! Operational HTTP endpoints.
//!
//! - `/`        : landing page (or JSON banner)
//! - `/health`  : database round trip
//! - `/metrics` : Prometheus text format

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::app_state::AppState;
use crate::config::Landing;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

pub const METRICS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

pub async fn landing(State(state): State<AppState>) -> Response {
    match state.cfg().server.landing {
        Landing::Page => Html(INDEX_HTML).into_response(),
        Landing::Json => Json(json!({ "message": "Balloon de Oro API" })).into_response(),
    }
}

pub async fn health(State(state): State<AppState>) -> Response {
    match state.store().ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "healthy" }))).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "status": "unhealthy" }))).into_response()
        }
    }
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = state.metrics().render();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, METRICS_CONTENT_TYPE)],
        body,
    )
        .into_response()
}
