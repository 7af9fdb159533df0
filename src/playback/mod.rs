mod clock;
mod error;
mod frame;

pub use clock::{
    PassSpan, PlaybackClock, PlaybackPhase, PlaybackState, Tick, DEFAULT_ANIMATION_CAP,
};
pub use error::PlaybackError;
pub use frame::{FrameHandle, FrameQueue, FrameScheduler};
