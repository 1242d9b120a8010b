//! Booster Content: item and booster catalog loading.
//!
//! Parses authored catalogs (JSON or YAML) into the in-memory item pool and
//! booster definitions the booster context consumes. Nothing downstream
//! parses files.

pub mod catalog;
pub mod error;
