mod angles;
mod projection;

pub use angles::{azimuth_distance, compass_point, interpolate_azimuth, normalize_azimuth};
pub use projection::{
    cartesian_to_spherical, observer_position, spherical_to_cartesian, Point3, Spherical,
};
