//! Booster Forge command-line driver.
//!
//! Loads the item and booster catalogs, rolls a player inventory, opens every
//! booster against it and renders the drops.

pub mod config;
pub mod error;
pub mod report;
