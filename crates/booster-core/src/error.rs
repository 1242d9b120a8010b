//! Domain error types.

use thiserror::Error;

/// Rejected input to a weighted draw.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RandomError {
    /// A weight is NaN or lies outside `[0, 1]`.
    #[error("invalid weight at index {index}: {value} is not within [0, 1]")]
    InvalidWeights {
        /// Position of the offending weight.
        index: usize,
        /// The offending weight.
        value: f64,
    },

    /// The weights do not sum to 1 at the requested decimal accuracy.
    #[error("weights sum to {sum}, expected 1 within {accuracy} decimal digits")]
    WeightSumMismatch {
        /// The raw sum of all weights.
        sum: f64,
        /// Number of decimal digits the sum was rounded to.
        accuracy: u32,
    },
}

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A weighted draw was handed invalid weights.
    #[error("randomness error: {0}")]
    Random(#[from] RandomError),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),
}
