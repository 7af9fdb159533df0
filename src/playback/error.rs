use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaybackError {
    #[error("playback already running")]
    AlreadyPlaying,
    #[error("pass span of {seconds}s cannot be played")]
    EmptySpan { seconds: f64 },
}
