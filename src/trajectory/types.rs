use serde::Serialize;
use utoipa::ToSchema;

use crate::geometry::Point3;

/// One sample of the visible arc.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct TrajectoryPoint {
    /// Sample index `i` out of `segments`.
    pub index: usize,
    /// Normalized parameter `i / segments`.
    pub t: f64,
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    pub position: Point3,
}

/// Ordered points of a pass, generated once per pass record.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Trajectory {
    pub segments: usize,
    pub points: Vec<TrajectoryPoint>,
}

impl Trajectory {
    pub fn empty(segments: usize) -> Self {
        Self {
            segments,
            points: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Sample index for a playback progress value.
    pub fn index_for(&self, progress: f64) -> usize {
        let progress = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        ((progress * self.segments as f64).round() as usize).min(self.segments)
    }

    /// Point at `round(progress * segments)`, or the nearest generated point
    /// when that sample was skipped.
    pub fn sample_at(&self, progress: f64) -> Option<&TrajectoryPoint> {
        let target = self.index_for(progress);
        match self.points.binary_search_by_key(&target, |p| p.index) {
            Ok(i) => self.points.get(i),
            Err(i) => {
                let after = self.points.get(i);
                let before = i.checked_sub(1).and_then(|b| self.points.get(b));
                match (before, after) {
                    (Some(b), Some(a)) => {
                        if target - b.index <= a.index - target {
                            Some(b)
                        } else {
                            Some(a)
                        }
                    }
                    (b, a) => b.or(a),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(index: usize, segments: usize) -> TrajectoryPoint {
        TrajectoryPoint {
            index,
            t: index as f64 / segments as f64,
            azimuth_deg: 0.0,
            elevation_deg: 0.0,
            position: Point3::new(index as f64, 0.0, 0.0),
        }
    }

    #[test]
    fn test_sample_rounds_progress() {
        let trajectory = Trajectory {
            segments: 4,
            points: (0..=4).map(|i| point(i, 4)).collect(),
        };
        assert_eq!(trajectory.sample_at(0.0).unwrap().index, 0);
        assert_eq!(trajectory.sample_at(0.374).unwrap().index, 1);
        assert_eq!(trajectory.sample_at(0.376).unwrap().index, 2);
        assert_eq!(trajectory.sample_at(1.0).unwrap().index, 4);
        assert_eq!(trajectory.sample_at(7.0).unwrap().index, 4);
        assert_eq!(trajectory.sample_at(f64::NAN).unwrap().index, 0);
    }

    #[test]
    fn test_sample_falls_back_to_nearest() {
        let trajectory = Trajectory {
            segments: 10,
            points: vec![point(0, 10), point(1, 10), point(6, 10), point(10, 10)],
        };
        assert_eq!(trajectory.sample_at(0.3).unwrap().index, 1);
        assert_eq!(trajectory.sample_at(0.5).unwrap().index, 6);
        assert_eq!(trajectory.sample_at(0.9).unwrap().index, 10);
    }

    #[test]
    fn test_empty_has_no_samples() {
        assert!(Trajectory::empty(100).sample_at(0.5).is_none());
    }
}
