//! Click API handlers.
//!
//! `button_id` is taken verbatim from the path: any non-empty segment is a
//! valid button. Storage failures become a bare 500 `{"status":"error"}`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use clickboard_core::error::ClickError;
use clickboard_core::model::{ClickView, Stat};

use crate::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct StatusBody {
    pub status: &'static str,
}

impl StatusBody {
    pub const SUCCESS: StatusBody = StatusBody { status: "success" };
    pub const ERROR: StatusBody = StatusBody { status: "error" };
}

/// Handler error: logged, then rendered without internal detail.
#[derive(Debug)]
pub struct ApiError(pub ClickError);

impl From<ClickError> for ApiError {
    fn from(e: ClickError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!(code = self.0.client_code().as_str(), error = %self.0, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(StatusBody::ERROR)).into_response()
    }
}

pub async fn log_click(
    State(state): State<AppState>,
    Path(button_id): Path<String>,
) -> Result<Json<StatusBody>, ApiError> {
    state.store().record_click(&button_id).await?;
    tracing::debug!(%button_id, "click recorded");
    Ok(Json(StatusBody::SUCCESS))
}

pub async fn recent_clicks(State(state): State<AppState>) -> Result<Json<Vec<ClickView>>, ApiError> {
    let limit = state.cfg().api.recent_limit;
    let clicks = state.store().recent_clicks(limit).await?;
    Ok(Json(clicks.iter().map(|c| c.view()).collect()))
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<Vec<Stat>>, ApiError> {
    Ok(Json(state.store().click_counts().await?))
}
