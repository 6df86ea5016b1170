//! Core traits for SVM implementation

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Source of uniformly distributed numbers in `[0, 1)`
///
/// The solver draws its random partner indices from this trait so tests can
/// swap in a seeded or scripted source.
pub trait UniformSource: Send {
    /// Next sample in `[0, 1)`
    fn next_uniform(&mut self) -> f64;
}

impl<R: RngCore + Send> UniformSource for R {
    fn next_uniform(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Seed derived from the wall clock
pub fn clock_seed() -> u64 {
    let now = chrono::Utc::now();
    now.timestamp_nanos_opt()
        .map(|nanos| nanos as u64)
        .unwrap_or_else(|| now.timestamp_micros() as u64)
}

/// Uniform source seeded with `seed`, or from the clock when `None`
pub fn uniform_source(seed: Option<u64>) -> Box<dyn UniformSource> {
    let seed = seed.unwrap_or_else(clock_seed);
    Box::new(StdRng::seed_from_u64(seed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_range() {
        let mut source = uniform_source(Some(7));
        for _ in 0..1000 {
            let u = source.next_uniform();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_seeded_sources_repeat() {
        let mut a = uniform_source(Some(42));
        let mut b = uniform_source(Some(42));
        for _ in 0..10 {
            assert_eq!(a.next_uniform(), b.next_uniform());
        }
    }

    #[test]
    fn test_any_rng_is_a_source() {
        use rand::rngs::mock::StepRng;
        use rand::rngs::SmallRng;

        let mut small = SmallRng::seed_from_u64(3);
        assert!((0.0..1.0).contains(&small.next_uniform()));

        let mut boxed: Box<dyn UniformSource> = Box::new(StepRng::new(0, 0));
        assert_eq!(boxed.next_uniform(), 0.0);
    }
}
