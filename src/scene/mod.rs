mod composition;
mod error;
mod render;

pub use composition::{
    Scene, SceneConfig, SceneEvent, SceneFrame, SceneStatus, DEFAULT_OBSERVER_RADIUS, GLOBE_RADIUS,
};
pub use error::{SceneError, VisualizationError};
pub use render::{SceneRenderer, SvgRenderer, DEFAULT_CAMERA};
