mod catalog;
mod error;
mod interpolation;
mod types;

pub use catalog::{PassCatalog, SatelliteInfo};
pub use error::{CatalogError, PassError};
pub use interpolation::{look_angle_at, look_angle_at_progress, sample_path, LookAngle, PathSample};
pub use types::{ObserverCoordinates, PassKey, PassRecord, PassSummary, ELEVATION_TOLERANCE_DEG};

#[cfg(test)]
pub(crate) use types::reference_pass;
