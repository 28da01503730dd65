//! Request timing middleware.
//!
//! Captures the start instant before dispatch and records count, duration,
//! and status once the inner service produced a response. The endpoint label
//! is the matched route template, so path parameters never become label
//! values; requests that matched no route are recorded as `unknown`.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};

use crate::app_state::AppState;
use crate::obs::metrics::UNKNOWN_ENDPOINT;

pub async fn track_http(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let start = Instant::now();
    let endpoint = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| UNKNOWN_ENDPOINT.to_owned());
    let method = req.method().as_str().to_owned();

    let resp = next.run(req).await;

    state
        .metrics()
        .observe_request(&endpoint, &method, resp.status().as_u16(), start.elapsed());
    resp
}
