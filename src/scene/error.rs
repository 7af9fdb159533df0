use thiserror::Error;

use crate::pass::PassError;
use crate::playback::PlaybackError;

/// Failure inside the render boundary. Recorded on the scene until retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VisualizationError {
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    #[error("render failed: {0}")]
    Render(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("no pass selected")]
    NoPass,
    #[error("no pass data: {0}")]
    NoData(PassError),
    #[error("invalid input: {0}")]
    InvalidInput(PassError),
    #[error("{0}")]
    Playback(#[from] PlaybackError),
}
