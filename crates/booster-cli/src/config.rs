//! Driver configuration read from environment variables.

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::AppError;

/// Item catalog used when `BOOSTER_ITEMS_PATH` is unset.
pub const DEFAULT_ITEMS_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/items.json");

/// Booster catalog used when `BOOSTER_CATALOG_PATH` is unset.
pub const DEFAULT_CATALOG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/boosters.json");

/// Item field each opening's drops are ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Alphabetical by name.
    Name,
    /// Ascending rarity, names alphabetical within a tier.
    #[default]
    Rarity,
    /// Ascending item type, names alphabetical within a type.
    Type,
    /// Ascending catalog ID.
    Id,
}

impl FromStr for SortKey {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "rarity" => Ok(Self::Rarity),
            "type" | "item_type" | "itemtype" => Ok(Self::Type),
            "id" => Ok(Self::Id),
            other => Err(AppError::Config(format!(
                "BOOSTER_SORT_BY must be one of name, rarity, type, id (got {other:?})"
            ))),
        }
    }
}

/// Report rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `||`-prefixed human-readable report.
    #[default]
    Text,
    /// Pretty-printed JSON document.
    Json,
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(AppError::Config(format!(
                "BOOSTER_OUTPUT must be text or json (got {other:?})"
            ))),
        }
    }
}

/// Everything the driver needs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Path of the item catalog.
    pub items_path: PathBuf,
    /// Path of the booster catalog.
    pub catalog_path: PathBuf,
    /// Seed shared by every booster and the inventory roll; `None` is
    /// non-deterministic.
    pub seed: Option<String>,
    /// Ordering of each opening's drops.
    pub sort_by: SortKey,
    /// Report rendering.
    pub output: OutputFormat,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            items_path: PathBuf::from(DEFAULT_ITEMS_PATH),
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            seed: None,
            sort_by: SortKey::default(),
            output: OutputFormat::default(),
        }
    }
}

impl CliConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `BOOSTER_SORT_BY` or `BOOSTER_OUTPUT`
    /// holds an unknown value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `BOOSTER_SORT_BY` or `BOOSTER_OUTPUT`
    /// holds an unknown value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();
        let sort_by = match lookup("BOOSTER_SORT_BY") {
            Some(value) => value.parse()?,
            None => defaults.sort_by,
        };
        let output = match lookup("BOOSTER_OUTPUT") {
            Some(value) => value.parse()?,
            None => defaults.output,
        };

        Ok(Self {
            items_path: lookup("BOOSTER_ITEMS_PATH").map_or(defaults.items_path, PathBuf::from),
            catalog_path: lookup("BOOSTER_CATALOG_PATH")
                .map_or(defaults.catalog_path, PathBuf::from),
            seed: lookup("BOOSTER_SEED").filter(|seed| !seed.is_empty()),
            sort_by,
            output,
        })
    }
}
