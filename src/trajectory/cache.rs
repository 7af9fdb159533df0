use std::sync::Arc;

use super::generator::TrajectoryGenerator;
use super::types::Trajectory;
use crate::pass::{PassError, PassKey, PassRecord};

pub type TrajectoryResult = Result<Arc<Trajectory>, PassError>;

/// Single-entry memo of the last generated trajectory.
///
/// Regenerates only when the pass identity changes, so repeated lookups for
/// the same pass hand out the same shared trajectory.
#[derive(Debug)]
pub struct TrajectoryCache {
    generator: TrajectoryGenerator,
    entry: Option<(PassKey, TrajectoryResult)>,
    generations: usize,
}

impl TrajectoryCache {
    pub fn new(generator: TrajectoryGenerator) -> Self {
        Self {
            generator,
            entry: None,
            generations: 0,
        }
    }

    /// Number of times a trajectory has actually been computed.
    pub fn generations(&self) -> usize {
        self.generations
    }

    pub fn get_or_generate(&mut self, pass: &PassRecord) -> TrajectoryResult {
        let key = pass.key();
        if let Some((cached_key, result)) = &self.entry {
            if *cached_key == key {
                return result.clone();
            }
        }

        let result = self.generator.generate(pass).map(Arc::new);
        self.generations += 1;
        if let Err(e) = &result {
            log::warn!("Pass rejected, no trajectory generated: {}", e);
        }
        self.entry = Some((key, result.clone()));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pass::reference_pass;

    #[test]
    fn test_same_pass_is_not_recomputed() {
        let mut cache = TrajectoryCache::new(TrajectoryGenerator::default());
        let pass = reference_pass();

        let first = cache.get_or_generate(&pass).unwrap();
        let second = cache.get_or_generate(&pass).unwrap();
        let copy = cache.get_or_generate(&pass.clone()).unwrap();

        assert_eq!(cache.generations(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&first, &copy));
    }

    #[test]
    fn test_new_pass_regenerates() {
        let mut cache = TrajectoryCache::new(TrajectoryGenerator::default());
        let pass = reference_pass();
        let mut other = reference_pass();
        other.max_elevation = 60.0;

        let first = cache.get_or_generate(&pass).unwrap();
        let second = cache.get_or_generate(&other).unwrap();
        assert_eq!(cache.generations(), 2);
        assert!(!Arc::ptr_eq(&first, &second));

        cache.get_or_generate(&pass).unwrap();
        assert_eq!(cache.generations(), 3);
    }

    #[test]
    fn test_rejection_is_memoized() {
        let mut cache = TrajectoryCache::new(TrajectoryGenerator::default());
        let mut pass = reference_pass();
        pass.end_time = pass.start_time;

        assert!(cache.get_or_generate(&pass).is_err());
        assert!(cache.get_or_generate(&pass).is_err());
        assert_eq!(cache.generations(), 1);
    }

    #[test]
    fn test_deterministic_output() {
        let a = TrajectoryGenerator::default().generate(&reference_pass()).unwrap();
        let b = TrajectoryGenerator::default().generate(&reference_pass()).unwrap();
        assert_eq!(a, b);
    }
}
