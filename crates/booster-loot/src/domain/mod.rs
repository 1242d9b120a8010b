//! Domain layer for the booster context.

pub mod booster;
pub mod policies;
pub mod settings;
