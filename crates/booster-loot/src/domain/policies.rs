//! Draw policies layered over the basic booster draw.
//!
//! Each policy is independent of the booster that owns it: luck escalates a
//! drawn rarity, type coverage narrows the candidates of a single draw, and
//! novelty weighting picks among candidates against owned counts.

use std::collections::{HashMap, HashSet};

use booster_core::error::RandomError;
use booster_core::item::{Inventory, Item, ItemId, ItemType, Rarity};
use booster_core::rng::{DEFAULT_DISTRIBUTION_ACCURACY, RandomSource};
use tracing::{debug, warn};

use super::settings::{DEFAULT_NEW_ITEM_CHANCE_MUL, DEFAULT_RARITY_UPGRADE_CHANCE};

/// Rarity escalation through a geometrically decaying chain of coin flips.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LuckPolicy {
    upgrade_chance: f64,
}

impl LuckPolicy {
    /// Highest upgrade level that may be attempted. Bounded by the number of
    /// item categories; rarity headroom is always the tighter bound.
    pub const MAX_UPGRADE_LEVEL: usize = ItemType::COUNT;

    /// Creates a policy from an optional upgrade chance, clamped into
    /// `[0, 1]`. `None` or NaN takes [`DEFAULT_RARITY_UPGRADE_CHANCE`].
    #[must_use]
    pub fn new(upgrade_chance: Option<f64>) -> Self {
        let Some(given) = upgrade_chance else {
            return Self {
                upgrade_chance: DEFAULT_RARITY_UPGRADE_CHANCE,
            };
        };
        let used = if given.is_nan() {
            DEFAULT_RARITY_UPGRADE_CHANCE
        } else {
            given.clamp(0.0, 1.0)
        };
        if given.is_nan() || given < 0.0 || given > 1.0 {
            warn!(
                field = "rarity_upgrade_chance",
                given,
                used,
                "config value clamped"
            );
        }
        Self {
            upgrade_chance: used,
        }
    }

    /// Chance of a one-level upgrade.
    #[must_use]
    pub fn upgrade_chance(&self) -> f64 {
        self.upgrade_chance
    }

    /// Flips a coin with probability `upgrade_chance ^ level`.
    ///
    /// Levels above [`Self::MAX_UPGRADE_LEVEL`] never succeed and consume no
    /// randomness.
    pub fn is_upgradable(&self, level: u8, random: &mut dyn RandomSource) -> bool {
        if usize::from(level) > Self::MAX_UPGRADE_LEVEL {
            return false;
        }
        random.random_coin(self.upgrade_chance.powi(i32::from(level)))
    }

    /// Attempts upgrades at levels `1, 2, ...` up to the tiers left above
    /// `rarity`; the first success raises `rarity` by that level.
    pub fn upgrade(&self, rarity: Rarity, random: &mut dyn RandomSource) -> Rarity {
        let headroom = Rarity::MAX.ordinal() - rarity.ordinal();
        for level in 1..=headroom {
            if self.is_upgradable(level, random) {
                let upgraded = rarity.raised(level);
                debug!(from = %rarity, to = %upgraded, level, "rarity upgraded");
                return upgraded;
            }
        }
        rarity
    }
}

/// Minimum drops per opening for a booster that covers every item type.
#[allow(clippy::cast_precision_loss)]
pub const TYPE_COVERAGE_MIN_ITEMS: f64 = (ItemType::COUNT - 1) as f64;

/// Narrows `candidates` to items whose type does not appear in `loot` yet.
///
/// Once every type the candidates offer has dropped, the narrowed view
/// would be empty; the full candidate list is returned instead.
#[must_use]
pub fn cover_missing_types<'a>(candidates: &[&'a Item], loot: &[Item]) -> Vec<&'a Item> {
    let used: HashSet<ItemType> = loot.iter().map(|item| item.item_type).collect();
    let missing: Vec<&'a Item> = candidates
        .iter()
        .copied()
        .filter(|item| !used.contains(&item.item_type))
        .collect();

    if missing.is_empty() {
        candidates.to_vec()
    } else {
        debug!(
            candidates = candidates.len(),
            narrowed = missing.len(),
            "narrowed draw to missing item types"
        );
        missing
    }
}

/// Selection bias toward items the player owns fewer copies of.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoveltyPolicy {
    new_item_chance_mul: f64,
}

impl NoveltyPolicy {
    /// Creates a policy from an optional multiplier. `None`, NaN and values
    /// below 1 become 1.
    #[must_use]
    pub fn new(new_item_chance_mul: Option<f64>) -> Self {
        let Some(given) = new_item_chance_mul else {
            return Self {
                new_item_chance_mul: DEFAULT_NEW_ITEM_CHANCE_MUL,
            };
        };
        if given.is_nan() || given < 1.0 {
            warn!(
                field = "new_item_chance_mul",
                given,
                used = DEFAULT_NEW_ITEM_CHANCE_MUL,
                "config value clamped"
            );
            return Self {
                new_item_chance_mul: DEFAULT_NEW_ITEM_CHANCE_MUL,
            };
        }
        Self {
            new_item_chance_mul: given,
        }
    }

    /// Multiplier applied to every un-normalized weight.
    #[must_use]
    pub fn new_item_chance_mul(&self) -> f64 {
        self.new_item_chance_mul
    }

    /// Owned count per candidate: inventory quantity plus copies already in
    /// `loot`.
    #[must_use]
    pub fn owned_counts(candidates: &[&Item], inventory: &Inventory, loot: &[Item]) -> Vec<f64> {
        let mut dropped: HashMap<ItemId, u32> = HashMap::new();
        for item in loot {
            *dropped.entry(item.id).or_default() += 1;
        }

        candidates
            .iter()
            .map(|item| {
                let held = inventory.get(&item.id).copied().unwrap_or(0);
                let opened = dropped.get(&item.id).copied().unwrap_or(0);
                f64::from(held) + f64::from(opened)
            })
            .collect()
    }

    /// Normalized draw weights for `candidates`, in candidate order.
    ///
    /// With `M = max(owned) + 1`, each candidate weighs
    /// `(M - owned) * new_item_chance_mul` before normalization, so no
    /// weight reaches zero. The multiplier scales every weight alike and
    /// cancels out once the weights are normalized.
    #[must_use]
    pub fn weights(&self, candidates: &[&Item], inventory: &Inventory, loot: &[Item]) -> Vec<f64> {
        let owned = Self::owned_counts(candidates, inventory, loot);
        let ceiling = owned.iter().copied().fold(0.0, f64::max) + 1.0;
        let raw: Vec<f64> = owned
            .iter()
            .map(|count| (ceiling - count) * self.new_item_chance_mul)
            .collect();
        let sum: f64 = raw.iter().sum();
        raw.into_iter().map(|weight| weight / sum).collect()
    }

    /// Picks a candidate by novelty weight.
    ///
    /// # Errors
    ///
    /// Returns the `RandomError` raised by the weighted draw.
    pub fn pick<'a>(
        &self,
        candidates: &[&'a Item],
        inventory: &Inventory,
        loot: &[Item],
        random: &mut dyn RandomSource,
    ) -> Result<Option<&'a Item>, RandomError> {
        if candidates.is_empty() {
            return Ok(None);
        }
        let weights = self.weights(candidates, inventory, loot);
        let index = random.random_distribution(&weights, DEFAULT_DISTRIBUTION_ACCURACY)?;
        Ok(candidates.get(index).copied())
    }
}

/// Picks a candidate uniformly: `round(random_int(0, len - 1))`.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn pick_uniform<'a>(candidates: &[&'a Item], random: &mut dyn RandomSource) -> Option<&'a Item> {
    let last = candidates.len().checked_sub(1)?;
    let index = random.random_int(0.0, last as f64).round() as usize;
    candidates.get(index.min(last)).copied()
}
