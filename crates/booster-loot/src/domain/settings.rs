//! Booster configuration and its normalization.
//!
//! Nothing here can fail: out-of-range values are clamped and missing
//! optional values take their defaults.

use booster_core::item::Rarity;
use serde::Deserialize;
use tracing::warn;

/// Rarity upgrade chance used by luck-aware boosters when none is configured.
pub const DEFAULT_RARITY_UPGRADE_CHANCE: f64 = 0.1;

/// Novelty multiplier used by collection boosters when none is configured.
pub const DEFAULT_NEW_ITEM_CHANCE_MUL: f64 = 1.0;

/// Requested number of drops: an exact count or a `[min, max]` range.
///
/// Deserializes from a number or a sequence. A one-element sequence is an
/// exact count, an empty one is the default, and elements past the second
/// are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "ItemCountRepr")]
pub enum ItemCount {
    /// Exactly this many drops (after rounding).
    Exact(f64),
    /// Between `min` and `max` drops, inclusive after rounding.
    Range(f64, f64),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ItemCountRepr {
    Exact(f64),
    Bounds(Vec<f64>),
}

impl From<ItemCountRepr> for ItemCount {
    fn from(repr: ItemCountRepr) -> Self {
        match repr {
            ItemCountRepr::Exact(count) => Self::Exact(count),
            ItemCountRepr::Bounds(bounds) => match bounds.as_slice() {
                [] => Self::default(),
                [count] => Self::Exact(*count),
                [min, max, ..] => Self::Range(*min, *max),
            },
        }
    }
}

impl Default for ItemCount {
    fn default() -> Self {
        Self::Exact(0.0)
    }
}

/// A normalized item-count range with `0 <= min <= max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemCountRange {
    min: f64,
    max: f64,
}

impl ItemCountRange {
    /// Normalizes `min` and `max`: a negative or NaN `min` becomes 0, and a
    /// `max` below `min` (or NaN) becomes `min`.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        let (given_min, given_max) = (min, max);
        let min = min.max(0.0);
        let max = if max.is_nan() || max < min { min } else { max };
        if given_min.is_nan() || given_min < 0.0 || given_max.is_nan() || given_max < min {
            warn!(
                field = "items_num_range",
                given_min,
                given_max,
                used_min = min,
                used_max = max,
                "config value clamped"
            );
        }
        Self { min, max }
    }

    /// Lower bound.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Returns a range whose `min` is at least `floor` and whose `max` is at
    /// least the new `min`.
    #[must_use]
    pub fn with_min_at_least(self, floor: f64) -> Self {
        let min = self.min.max(floor);
        Self::new(min, self.max.max(min))
    }
}

impl From<ItemCount> for ItemCountRange {
    fn from(count: ItemCount) -> Self {
        match count {
            ItemCount::Exact(n) => Self::new(n, n),
            ItemCount::Range(min, max) => Self::new(min, max),
        }
    }
}

/// Configuration shared by every booster type. Fields a type does not use
/// are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoosterSettings {
    /// Seed for a reproducible random source; `None` or empty draws from the
    /// platform generator.
    pub random_seed: Option<String>,
    /// Highest rarity an ordinary draw may reach.
    pub rarity: Rarity,
    /// Number of upcoming draws forced to `rarity`.
    pub rarity_guarantee: Option<u32>,
    /// Number of drops per opening.
    pub items_num_range: ItemCount,
    /// Base chance of a one-tier rarity upgrade (luck and later types).
    pub rarity_upgrade_chance: Option<f64>,
    /// Strength of the bias toward unowned items (collection type).
    pub new_item_chance_mul: Option<f64>,
    /// Keep loot history across openings of the same instance.
    pub carry_loot_history: bool,
}

impl BoosterSettings {
    /// Overlays the fields set in `common` onto these settings.
    #[must_use]
    pub fn merged_with(mut self, common: &BoosterSettings) -> Self {
        if common.random_seed.is_some() {
            self.random_seed.clone_from(&common.random_seed);
        }
        self
    }
}
