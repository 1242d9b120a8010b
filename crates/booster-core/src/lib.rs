//! Booster Core: shared item model and randomness abstractions.
//!
//! This crate defines the types every booster context depends on: the item
//! catalog, player inventory, the `RandomSource` seam and domain errors. It
//! contains no loading or presentation code.

pub mod error;
pub mod item;
pub mod rng;
