use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::pass::{sample_path, ObserverCoordinates, PassRecord, PathSample};
use crate::scene::{SceneError, SceneStatus};
use crate::trajectory::Trajectory;
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::server::AppState;

const DEFAULT_PATH_STEP: &str = "5s";

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub session: Uuid,
    #[serde(flatten)]
    pub status: SceneStatus,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PathQuery {
    /// Sample spacing, e.g. `5s` or `1m`.
    pub step: Option<String>,
    /// Decimal places kept on angles.
    pub decimals: Option<u32>,
}

#[utoipa::path(
    get,
    path = "/api/status",
    responses(
        (status = 200, description = "Playback state, pass summary and fault", body = StatusResponse),
        (status = 503, description = "View session gone", body = ErrorResponse)
    ),
    tag = "view"
)]
pub async fn status(State(state): State<AppState>) -> ApiResult<Json<StatusResponse>> {
    let status = state.session.status().await?;
    Ok(Json(StatusResponse {
        session: state.session.id(),
        status,
    }))
}

#[utoipa::path(
    get,
    path = "/api/view.svg",
    responses(
        (status = 200, description = "Rendered scene", content_type = "image/svg+xml", body = String),
        (status = 422, description = "Visualization fault; dismiss with /api/retry", body = ErrorResponse),
        (status = 503, description = "View session gone", body = ErrorResponse)
    ),
    tag = "view"
)]
pub async fn view_svg(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let svg = state.session.render().await??;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}

#[utoipa::path(
    get,
    path = "/api/trajectory",
    responses(
        (status = 200, description = "Trajectory of the selected pass", body = Trajectory),
        (status = 400, description = "Selected pass has no data", body = ErrorResponse),
        (status = 409, description = "No pass selected", body = ErrorResponse),
        (status = 503, description = "View session gone", body = ErrorResponse)
    ),
    tag = "view"
)]
pub async fn trajectory(State(state): State<AppState>) -> ApiResult<Json<Trajectory>> {
    let trajectory = state.session.trajectory().await??;
    Ok(Json(Trajectory::clone(&trajectory)))
}

#[utoipa::path(
    get,
    path = "/api/path",
    params(PathQuery),
    responses(
        (status = 200, description = "Time-stepped look angles of the selected pass", body = Vec<PathSample>),
        (status = 400, description = "Invalid step or pass", body = ErrorResponse),
        (status = 409, description = "No pass selected", body = ErrorResponse),
        (status = 503, description = "View session gone", body = ErrorResponse)
    ),
    tag = "view"
)]
pub async fn path(
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> ApiResult<Json<Vec<PathSample>>> {
    let step = parse_step(query.step.as_deref().unwrap_or(DEFAULT_PATH_STEP))?;
    let pass = state
        .session
        .selected_pass()
        .await?
        .ok_or(SceneError::NoPass)?;
    let samples = sample_path(&pass, step, query.decimals.unwrap_or(0))
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    Ok(Json(samples))
}

#[utoipa::path(
    post,
    path = "/api/pass",
    request_body = PassRecord,
    responses(
        (status = 200, description = "Pass selected", body = StatusResponse),
        (status = 400, description = "Pass rejected; the view shows no data", body = ErrorResponse),
        (status = 503, description = "View session gone", body = ErrorResponse)
    ),
    tag = "view"
)]
pub async fn select_pass(
    State(state): State<AppState>,
    Json(pass): Json<PassRecord>,
) -> ApiResult<Json<StatusResponse>> {
    let status = state.session.select_pass(pass).await??;
    Ok(Json(StatusResponse {
        session: state.session.id(),
        status,
    }))
}

#[utoipa::path(
    post,
    path = "/api/observer",
    request_body = ObserverCoordinates,
    responses(
        (status = 200, description = "Observer moved", body = StatusResponse),
        (status = 400, description = "Invalid coordinates", body = ErrorResponse),
        (status = 503, description = "View session gone", body = ErrorResponse)
    ),
    tag = "view"
)]
pub async fn set_observer(
    State(state): State<AppState>,
    Json(observer): Json<ObserverCoordinates>,
) -> ApiResult<Json<StatusResponse>> {
    let status = state.session.set_observer(observer).await??;
    Ok(Json(StatusResponse {
        session: state.session.id(),
        status,
    }))
}

pub(crate) fn parse_step(step: &str) -> ApiResult<chrono::Duration> {
    humantime::parse_duration(step.trim())
        .map_err(|e| e.to_string())
        .and_then(|d| chrono::Duration::from_std(d).map_err(|e| e.to_string()))
        .map_err(|e| ApiError::Validation(format!("invalid step '{}': {}", step, e)))
}
