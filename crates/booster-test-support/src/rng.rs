//! Deterministic `RandomSource` implementations for tests.

use booster_core::rng::RandomSource;

/// A source that returns the same draw forever. Suitable for tests that do
/// not depend on specific random values, or that want every draw pinned to
/// one end of its range.
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom(pub f64);

impl RandomSource for FixedRandom {
    fn random(&mut self) -> f64 {
        self.0
    }
}

/// A source that returns values from a predetermined sequence. Panics if the
/// sequence is exhausted. Used in tests that need specific, repeatable draws
/// (e.g., forcing which item or which upgrade level a booster picks).
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<f64>,
    index: usize,
}

impl SequenceRandom {
    /// Create a new `SequenceRandom` with the given values.
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, index: 0 }
    }

    /// Number of draws consumed so far.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.index
    }
}

impl RandomSource for SequenceRandom {
    fn random(&mut self) -> f64 {
        let value = self.values[self.index];
        self.index += 1;
        value
    }
}
