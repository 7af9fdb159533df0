use super::types::{Trajectory, TrajectoryPoint};
use crate::geometry::spherical_to_cartesian;
use crate::pass::{look_angle_at_progress, PassError, PassRecord};

pub const DEFAULT_SEGMENTS: usize = 100;
pub const DEFAULT_SATELLITE_RADIUS: f64 = 1.2;

/// Samples a pass at a fixed resolution onto the satellite shell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryGenerator {
    pub segments: usize,
    pub radius: f64,
}

impl Default for TrajectoryGenerator {
    fn default() -> Self {
        Self {
            segments: DEFAULT_SEGMENTS,
            radius: DEFAULT_SATELLITE_RADIUS,
        }
    }
}

impl TrajectoryGenerator {
    pub fn new(segments: usize, radius: f64) -> Self {
        Self {
            segments: segments.max(1),
            radius,
        }
    }

    /// Build the full start-to-end arc. Samples below the horizon, above
    /// zenith, or with non-finite coordinates are dropped.
    pub fn generate(&self, pass: &PassRecord) -> Result<Trajectory, PassError> {
        pass.validate()?;

        let mut points = Vec::with_capacity(self.segments + 1);
        let mut dropped = 0usize;

        for index in 0..=self.segments {
            let t = index as f64 / self.segments as f64;
            let angle = look_angle_at_progress(pass, t);

            if !(0.0..=90.0).contains(&angle.elevation_deg) {
                dropped += 1;
                continue;
            }

            let position = spherical_to_cartesian(angle.azimuth_deg, angle.elevation_deg, self.radius);
            if !position.is_finite() {
                dropped += 1;
                continue;
            }

            points.push(TrajectoryPoint {
                index,
                t,
                azimuth_deg: angle.azimuth_deg,
                elevation_deg: angle.elevation_deg,
                position,
            });
        }

        if dropped > 0 {
            log::debug!("Dropped {} of {} trajectory samples", dropped, self.segments + 1);
        }

        Ok(Trajectory {
            segments: self.segments,
            points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{cartesian_to_spherical, Point3};
    use crate::pass::reference_pass;

    #[test]
    fn test_reference_pass_shape() {
        let trajectory = TrajectoryGenerator::default().generate(&reference_pass()).unwrap();
        assert_eq!(trajectory.len(), DEFAULT_SEGMENTS + 1);

        let first = trajectory.points.first().unwrap();
        let last = trajectory.points.last().unwrap();
        assert!(first.elevation_deg.abs() < 1e-9);
        assert!(last.elevation_deg.abs() < 1e-9);

        let peak = trajectory
            .points
            .iter()
            .max_by(|a, b| a.elevation_deg.total_cmp(&b.elevation_deg))
            .unwrap();
        assert!((peak.elevation_deg - 45.0).abs() < 1e-9);
        assert_eq!(peak.index, DEFAULT_SEGMENTS / 2);
    }

    #[test]
    fn test_points_are_ordered_and_on_shell() {
        let trajectory = TrajectoryGenerator::new(20, 1.2).generate(&reference_pass()).unwrap();
        for pair in trajectory.points.windows(2) {
            assert!(pair[0].index < pair[1].index);
        }
        for p in &trajectory.points {
            assert!((p.position.norm() - 1.2).abs() < 1e-9);
        }
    }

    #[test]
    fn test_positions_invert_to_look_angles() {
        let trajectory = TrajectoryGenerator::new(10, 1.2).generate(&reference_pass()).unwrap();
        for p in &trajectory.points[1..trajectory.len() - 1] {
            let back = cartesian_to_spherical(p.position).unwrap();
            assert!((back.elevation_deg - p.elevation_deg).abs() < 1e-9);
            assert!((back.azimuth_deg - p.azimuth_deg).abs() < 1e-6);
        }
    }

    #[test]
    fn test_invalid_pass_is_rejected() {
        let mut pass = reference_pass();
        pass.end_time = -10;
        assert!(TrajectoryGenerator::default().generate(&pass).is_err());
    }

    #[test]
    fn test_samples_below_horizon_are_skipped() {
        let mut pass = reference_pass();
        pass.start_elevation = -0.4;
        let trajectory = TrajectoryGenerator::new(10, 1.2).generate(&pass).unwrap();
        assert_eq!(trajectory.len(), 10);
        assert_eq!(trajectory.points[0].index, 1);
        assert_ne!(trajectory.points[0].position, Point3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_non_finite_positions_are_skipped() {
        for radius in [f64::NAN, f64::INFINITY] {
            let trajectory = TrajectoryGenerator::new(10, radius)
                .generate(&reference_pass())
                .unwrap();
            assert!(trajectory.is_empty());
            assert_eq!(trajectory.segments, 10);
            assert!(trajectory.sample_at(0.5).is_none());
        }
    }
}
