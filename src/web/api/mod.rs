pub mod error;
pub mod playback;
pub mod view;
