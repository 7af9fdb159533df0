mod cache;
mod generator;
mod types;

pub use cache::{TrajectoryCache, TrajectoryResult};
pub use generator::{TrajectoryGenerator, DEFAULT_SATELLITE_RADIUS, DEFAULT_SEGMENTS};
pub use types::{Trajectory, TrajectoryPoint};
