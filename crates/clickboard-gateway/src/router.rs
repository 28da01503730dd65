//! Axum router wiring.
//!
//! Layers, innermost first: request metrics, tracing spans, permissive CORS.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{api, app_state::AppState, obs::track, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ops::landing))
        .route("/log-click/:button_id", post(api::log_click))
        .route("/clicks", get(api::recent_clicks))
        .route("/stats", get(api::stats))
        .route("/health", get(ops::health))
        .route("/metrics", get(ops::metrics))
        .layer(middleware::from_fn_with_state(state.clone(), track::track_http))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
