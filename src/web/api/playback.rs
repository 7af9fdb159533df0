use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::playback::PlaybackState;
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::server::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct RetryResponse {
    /// Whether a fault was recorded and has been cleared.
    pub cleared: bool,
}

#[utoipa::path(
    post,
    path = "/api/playback/toggle",
    responses(
        (status = 200, description = "Playback started or paused", body = PlaybackState),
        (status = 400, description = "Selected pass has no data", body = ErrorResponse),
        (status = 409, description = "No pass selected or nothing to play", body = ErrorResponse),
        (status = 503, description = "View session gone", body = ErrorResponse)
    ),
    tag = "playback"
)]
pub async fn toggle(State(state): State<AppState>) -> ApiResult<Json<PlaybackState>> {
    let playback = state.session.toggle().await??;
    log::debug!("Playback toggled: {}", playback.phase);
    Ok(Json(playback))
}

#[utoipa::path(
    post,
    path = "/api/playback/reset",
    responses(
        (status = 200, description = "Playback rewound", body = PlaybackState),
        (status = 409, description = "No pass selected", body = ErrorResponse),
        (status = 503, description = "View session gone", body = ErrorResponse)
    ),
    tag = "playback"
)]
pub async fn reset(State(state): State<AppState>) -> ApiResult<Json<PlaybackState>> {
    Ok(Json(state.session.reset().await??))
}

#[utoipa::path(
    post,
    path = "/api/retry",
    responses(
        (status = 200, description = "Visualization fault dismissed", body = RetryResponse),
        (status = 503, description = "View session gone", body = ErrorResponse)
    ),
    tag = "playback"
)]
pub async fn retry(State(state): State<AppState>) -> ApiResult<Json<RetryResponse>> {
    let cleared = state.session.retry().await?;
    Ok(Json(RetryResponse { cleared }))
}

#[utoipa::path(
    post,
    path = "/api/close",
    responses(
        (status = 204, description = "Visualization closed"),
        (status = 503, description = "View session gone", body = ErrorResponse)
    ),
    tag = "playback"
)]
pub async fn close(State(state): State<AppState>) -> ApiResult<axum::http::StatusCode> {
    state.session.close().await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}
