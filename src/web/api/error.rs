use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::playback::PlaybackError;
use crate::scene::{SceneError, VisualizationError};
use crate::web::session::SessionError;

#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    Conflict(&'static str, Option<String>),
    Visualization(VisualizationError),
    Unavailable(SessionError),
}

impl From<SceneError> for ApiError {
    fn from(e: SceneError) -> Self {
        match e {
            SceneError::NoPass => ApiError::Conflict("no_pass_selected", None),
            SceneError::NoData(e) | SceneError::InvalidInput(e) => {
                ApiError::Validation(e.to_string())
            }
            SceneError::Playback(e @ PlaybackError::AlreadyPlaying) => {
                ApiError::Conflict("already_playing", Some(e.to_string()))
            }
            SceneError::Playback(e @ PlaybackError::EmptySpan { .. }) => {
                ApiError::Conflict("empty_span", Some(e.to_string()))
            }
        }
    }
}

impl From<VisualizationError> for ApiError {
    fn from(e: VisualizationError) -> Self {
        ApiError::Visualization(e)
    }
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        ApiError::Unavailable(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_message("validation_failed", &msg)),
            )
                .into_response(),
            ApiError::Conflict(reason, None) => {
                (StatusCode::CONFLICT, Json(ErrorResponse::new(reason))).into_response()
            }
            ApiError::Conflict(reason, Some(msg)) => (
                StatusCode::CONFLICT,
                Json(ErrorResponse::with_message(reason, &msg)),
            )
                .into_response(),
            ApiError::Visualization(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse::with_message(
                    "visualization_error",
                    &e.to_string(),
                )),
            )
                .into_response(),
            ApiError::Unavailable(e) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::with_message("session_unavailable", &e.to_string())),
            )
                .into_response(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: None,
        }
    }

    pub fn with_message(error: &str, message: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: Some(message.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pass::PassError;
    use uuid::Uuid;

    fn status(e: impl Into<ApiError>) -> StatusCode {
        e.into().into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            status(SceneError::InvalidInput(PassError::InvalidStep)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(SceneError::NoData(PassError::EmptySpan { seconds: 0 })),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status(SceneError::NoPass), StatusCode::CONFLICT);
        assert_eq!(
            status(SceneError::Playback(PlaybackError::AlreadyPlaying)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status(VisualizationError::Render("lost".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status(SessionError::Closed(Uuid::nil())),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
