//! Random price variance
//!
//! The auction's only source of non-determinism. Production draws from a
//! ChaCha8 stream seeded from the OS; tests seed it or pin the factor.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Supplies one multiplicative variance factor per bid.
pub trait VarianceSource {
    /// Next factor in `[min, max]`.
    fn next_factor(&mut self, min: f64, max: f64) -> f64;
}

/// ChaCha8-backed source; reproducible when built from a seed.
#[derive(Debug, Clone)]
pub struct SeededVariance {
    rng: ChaCha8Rng,
}

impl SeededVariance {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }
}

impl VarianceSource for SeededVariance {
    fn next_factor(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..=max)
    }
}

/// Always returns the same factor, clamped into the requested bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedVariance(pub f64);

impl Default for FixedVariance {
    fn default() -> Self {
        FixedVariance(1.0)
    }
}

impl VarianceSource for FixedVariance {
    fn next_factor(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        self.0.clamp(min, max)
    }
}
