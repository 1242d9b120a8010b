//! Random number generator abstraction for determinism.
//!
//! In production, this wraps the thread-local platform generator. In tests
//! and reproducible runs, a generator seeded from a string is injected.
//! Every derived draw is composed from [`RandomSource::random`], so swapping
//! the source swaps all sampling built on top of it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

use crate::error::RandomError;

/// Probability used by a coin flip when the caller has no preference.
pub const DEFAULT_COIN_PROBABILITY: f64 = 0.5;

/// Decimal digits a weight sum is rounded to before it is compared with 1.
pub const DEFAULT_DISTRIBUTION_ACCURACY: u32 = 5;

/// Largest accuracy a weight-sum check honours; an `f64` carries no more
/// significant decimal digits than this. Larger requests are treated as 15.
pub const MAX_DISTRIBUTION_ACCURACY: u32 = 15;

/// Abstraction over uniform random draws.
pub trait RandomSource: Send + Sync {
    /// Generate a uniform `f64` in `[0.0, 1.0)`.
    fn random(&mut self) -> f64;

    /// Generate a uniform `f64` in `[min, max)`. Rounding is left to the
    /// caller.
    fn random_int(&mut self, min: f64, max: f64) -> f64 {
        self.random() * (max - min) + min
    }

    /// Returns `true` with roughly `probability` likelihood.
    ///
    /// Draws a window of width `probability` centred somewhere in `[0, 1)`,
    /// then reports whether a second draw lands strictly inside it.
    fn random_coin(&mut self, probability: f64) -> bool {
        let half = probability / 2.0;
        let center = self.random_int(half, 1.0 - half);
        let draw = self.random();
        center - half < draw && draw < center + half
    }

    /// Picks an index into `weights`, each index with its weight as
    /// probability.
    ///
    /// # Errors
    ///
    /// Returns `RandomError::InvalidWeights` if a weight is NaN or outside
    /// `[0, 1]`, and `RandomError::WeightSumMismatch` if the weights do not
    /// sum to 1 once rounded to `accuracy` decimal digits. `accuracy` is
    /// capped at [`MAX_DISTRIBUTION_ACCURACY`]. Weights are never normalized
    /// on the caller's behalf.
    fn random_distribution(&mut self, weights: &[f64], accuracy: u32) -> Result<usize, RandomError> {
        validate_weights(weights, accuracy)?;

        let draw = self.random();
        let mut cumulative = 0.0;
        for (index, weight) in weights.iter().enumerate() {
            cumulative += weight;
            if cumulative > draw {
                return Ok(index);
            }
        }
        // Rounding can leave the draw at or above every partial sum.
        Ok(weights.len() - 1)
    }
}

#[allow(clippy::cast_possible_wrap, clippy::float_cmp)]
fn validate_weights(weights: &[f64], accuracy: u32) -> Result<(), RandomError> {
    if let Some((index, &value)) = weights
        .iter()
        .enumerate()
        .find(|(_, weight)| !(0.0..=1.0).contains(*weight))
    {
        return Err(RandomError::InvalidWeights { index, value });
    }

    let sum: f64 = weights.iter().sum();
    let scale = 10_f64.powi(accuracy.min(MAX_DISTRIBUTION_ACCURACY) as i32);
    if (sum * scale).round() != scale {
        return Err(RandomError::WeightSumMismatch { sum, accuracy });
    }
    Ok(())
}

/// Production source backed by the thread-local platform generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn random(&mut self) -> f64 {
        rand::rng().random()
    }
}

/// Deterministic source derived from a seed string.
///
/// The seed is hashed with SHA-256 into the 32-byte key of a [`StdRng`], so
/// two sources built from the same string yield the same sequence.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Creates a source seeded from `seed`.
    #[must_use]
    pub fn new(seed: &str) -> Self {
        let key: [u8; 32] = Sha256::digest(seed.as_bytes()).into();
        Self {
            rng: StdRng::from_seed(key),
        }
    }
}

impl RandomSource for SeededRandom {
    fn random(&mut self) -> f64 {
        self.rng.random()
    }
}

/// Returns a seeded source for a non-empty `seed`, otherwise a
/// [`ThreadRandom`].
#[must_use]
pub fn random_source_for(seed: Option<&str>) -> Box<dyn RandomSource> {
    match seed {
        Some(seed) if !seed.is_empty() => Box::new(SeededRandom::new(seed)),
        _ => Box::new(ThreadRandom),
    }
}
