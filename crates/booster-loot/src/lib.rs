//! Booster Loot: the booster opening bounded context.
//!
//! Responsible for turning a booster configuration and a shared item pool
//! into randomized drops: item-count and rarity draws, luck upgrades,
//! per-opening type coverage and novelty weighting against a player
//! inventory.

pub mod application;
pub mod domain;
