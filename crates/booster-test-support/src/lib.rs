//! Shared test doubles and fixtures for booster openings.

mod fixtures;
mod logs;
mod rng;

pub use fixtures::{item, pool_of};
pub use logs::capture_warnings;
pub use rng::{FixedRandom, SequenceRandom};
