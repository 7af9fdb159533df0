use utoipa::OpenApi;

use super::api::error::ErrorResponse;
use super::api::playback::RetryResponse;
use super::api::view::StatusResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::view::status,
        super::api::view::view_svg,
        super::api::view::trajectory,
        super::api::view::path,
        super::api::view::select_pass,
        super::api::view::set_observer,
        super::api::playback::toggle,
        super::api::playback::reset,
        super::api::playback::retry,
        super::api::playback::close,
    ),
    components(
        schemas(
            StatusResponse,
            RetryResponse,
            ErrorResponse,
            crate::pass::PassRecord,
            crate::pass::PassSummary,
            crate::pass::PathSample,
            crate::pass::ObserverCoordinates,
            crate::playback::PlaybackState,
            crate::playback::PlaybackPhase,
            crate::scene::SceneStatus,
            crate::scene::SceneEvent,
            crate::trajectory::Trajectory,
            crate::trajectory::TrajectoryPoint,
            crate::geometry::Point3,
        )
    ),
    info(
        title = "Pass Viz API",
        description = "Animated satellite pass view: scene rendering, playback controls and status",
        version = "0.1.0"
    ),
    tags(
        (name = "view", description = "Pass selection, rendering and status"),
        (name = "playback", description = "Playback controls")
    )
)]
pub struct ApiDoc;
