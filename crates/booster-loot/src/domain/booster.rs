//! The booster: a configured generator of randomized drops.

use std::fmt;
use std::sync::Arc;

use booster_core::error::DomainError;
use booster_core::item::{Inventory, Item, ItemPool, Rarity};
use booster_core::rng::{RandomSource, random_source_for};
use tracing::debug;

use super::policies::{
    LuckPolicy, NoveltyPolicy, TYPE_COVERAGE_MIN_ITEMS, cover_missing_types, pick_uniform,
};
use super::settings::{BoosterSettings, ItemCountRange};

/// Booster type names recognized by dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoosterType {
    /// Count, item and rarity draws only.
    Booster,
    /// Adds rarity upgrades.
    LuckBooster,
    /// Adds per-opening type coverage.
    UniformBooster,
    /// Adds novelty weighting against the player inventory.
    CollectionBooster,
}

impl BoosterType {
    /// Resolves a type name case-insensitively. Unrecognized names resolve
    /// to the basic [`BoosterType::Booster`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "luckbooster" => Self::LuckBooster,
            "uniformbooster" => Self::UniformBooster,
            "collectionbooster" => Self::CollectionBooster,
            _ => Self::Booster,
        }
    }

    /// Display name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Booster => "Booster",
            Self::LuckBooster => "LuckBooster",
            Self::UniformBooster => "UniformBooster",
            Self::CollectionBooster => "CollectionBooster",
        }
    }
}

impl fmt::Display for BoosterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The policies a booster applies on top of the basic draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoosterKind {
    /// No extra policy.
    Basic,
    /// Rarity upgrades.
    Luck(LuckPolicy),
    /// Rarity upgrades and type coverage.
    Uniform(LuckPolicy),
    /// Rarity upgrades, type coverage and novelty weighting.
    Collection {
        /// Upgrade policy.
        luck: LuckPolicy,
        /// Novelty weighting policy.
        novelty: NoveltyPolicy,
    },
}

impl BoosterKind {
    fn from_settings(booster_type: BoosterType, settings: &BoosterSettings) -> Self {
        let luck = LuckPolicy::new(settings.rarity_upgrade_chance);
        match booster_type {
            BoosterType::Booster => Self::Basic,
            BoosterType::LuckBooster => Self::Luck(luck),
            BoosterType::UniformBooster => Self::Uniform(luck),
            BoosterType::CollectionBooster => Self::Collection {
                luck,
                novelty: NoveltyPolicy::new(settings.new_item_chance_mul),
            },
        }
    }

    /// The type name this kind was built from.
    #[must_use]
    pub fn booster_type(&self) -> BoosterType {
        match self {
            Self::Basic => BoosterType::Booster,
            Self::Luck(_) => BoosterType::LuckBooster,
            Self::Uniform(_) => BoosterType::UniformBooster,
            Self::Collection { .. } => BoosterType::CollectionBooster,
        }
    }

    /// Rarity upgrade policy, if any.
    #[must_use]
    pub fn luck(&self) -> Option<LuckPolicy> {
        match self {
            Self::Basic => None,
            Self::Luck(luck) | Self::Uniform(luck) | Self::Collection { luck, .. } => Some(*luck),
        }
    }

    /// Whether every item type must drop before any type repeats.
    #[must_use]
    pub fn covers_types(&self) -> bool {
        matches!(self, Self::Uniform(_) | Self::Collection { .. })
    }

    /// Novelty weighting policy, if any.
    #[must_use]
    pub fn novelty(&self) -> Option<NoveltyPolicy> {
        match self {
            Self::Collection { novelty, .. } => Some(*novelty),
            _ => None,
        }
    }
}

/// A booster over a shared item pool.
///
/// The instance owns its random source, rarity-guarantee counter and loot
/// history. The guarantee counter is never reset; the loot history is reset
/// at the start of each opening unless `carry_loot_history` was configured.
pub struct Booster {
    kind: BoosterKind,
    rarity: Rarity,
    rarity_guarantee: Option<u32>,
    items_num_range: ItemCountRange,
    carry_loot_history: bool,
    pool: Arc<ItemPool>,
    random: Box<dyn RandomSource>,
    loot: Vec<Item>,
}

impl Booster {
    /// Creates a booster, seeding its random source from
    /// `settings.random_seed` when one is set.
    #[must_use]
    pub fn new(booster_type: BoosterType, settings: BoosterSettings, pool: Arc<ItemPool>) -> Self {
        let random = random_source_for(settings.random_seed.as_deref());
        Self::with_random(booster_type, settings, pool, random)
    }

    /// Creates a booster drawing from an explicitly provided random source.
    #[must_use]
    pub fn with_random(
        booster_type: BoosterType,
        settings: BoosterSettings,
        pool: Arc<ItemPool>,
        random: Box<dyn RandomSource>,
    ) -> Self {
        let kind = BoosterKind::from_settings(booster_type, &settings);
        let mut items_num_range = ItemCountRange::from(settings.items_num_range);
        if kind.covers_types() {
            items_num_range = items_num_range.with_min_at_least(TYPE_COVERAGE_MIN_ITEMS);
        }

        Self {
            kind,
            rarity: settings.rarity,
            rarity_guarantee: settings.rarity_guarantee,
            items_num_range,
            carry_loot_history: settings.carry_loot_history,
            pool,
            random,
            loot: Vec::new(),
        }
    }

    /// The policies this booster applies.
    #[must_use]
    pub fn kind(&self) -> BoosterKind {
        self.kind
    }

    /// The type name this booster was built from.
    #[must_use]
    pub fn booster_type(&self) -> BoosterType {
        self.kind.booster_type()
    }

    /// Rarity cap of ordinary draws.
    #[must_use]
    pub fn rarity(&self) -> Rarity {
        self.rarity
    }

    /// Remaining draws forced to the rarity cap, if a guarantee is set.
    #[must_use]
    pub fn rarity_guarantee(&self) -> Option<u32> {
        self.rarity_guarantee
    }

    /// Normalized drop-count range.
    #[must_use]
    pub fn items_num_range(&self) -> ItemCountRange {
        self.items_num_range
    }

    /// The shared item pool.
    #[must_use]
    pub fn pool(&self) -> &Arc<ItemPool> {
        &self.pool
    }

    /// Drops remembered for type coverage and owned counts.
    #[must_use]
    pub fn loot_history(&self) -> &[Item] {
        &self.loot
    }

    /// Opens the booster, returning this opening's drops in draw order.
    ///
    /// The inventory only informs this call. Without one, an empty inventory
    /// is assumed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a collection booster is opened
    /// without an inventory, and `DomainError::Random` if a weighted draw
    /// rejects its weights.
    pub fn open(&mut self, inventory: Option<&Inventory>) -> Result<Vec<Item>, DomainError> {
        if self.pool.is_empty() {
            return Ok(Vec::new());
        }

        let empty = Inventory::new();
        let inventory = match inventory {
            Some(inventory) => inventory,
            None if self.kind.novelty().is_some() => {
                return Err(DomainError::Validation(
                    "collection booster requires a player inventory".to_owned(),
                ));
            }
            None => &empty,
        };

        if !self.carry_loot_history {
            self.loot.clear();
        }
        let first_drop = self.loot.len();

        let count = self.draw_item_count();
        for _ in 0..count {
            let Some(drop) = self.draw_item(inventory)? else {
                break;
            };
            self.loot.push(drop);
        }

        Ok(self.loot[first_drop..].to_vec())
    }

    /// `round(random_int(min, max))`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn draw_item_count(&mut self) -> usize {
        let range = self.items_num_range;
        self.random.random_int(range.min(), range.max()).round().max(0.0) as usize
    }

    /// Picks an item, then a rarity for its copy, then applies any upgrade.
    fn draw_item(&mut self, inventory: &Inventory) -> Result<Option<Item>, DomainError> {
        let pool = Arc::clone(&self.pool);
        let all: Vec<&Item> = pool.iter().collect();
        let candidates = if self.kind.covers_types() {
            cover_missing_types(&all, &self.loot)
        } else {
            all
        };

        let picked = match self.kind.novelty() {
            Some(novelty) => {
                novelty.pick(&candidates, inventory, &self.loot, self.random.as_mut())?
            }
            None => pick_uniform(&candidates, self.random.as_mut()),
        };
        let Some(source) = picked else {
            return Ok(None);
        };

        let mut drop = source.with_rarity(self.draw_rarity());
        if let Some(luck) = self.kind.luck() {
            drop.rarity = luck.upgrade(drop.rarity, self.random.as_mut());
        }
        Ok(Some(drop))
    }

    /// Rarity for an ordinary draw, capped at `self.rarity`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn draw_rarity(&mut self) -> Rarity {
        let cap = self.rarity;
        if cap <= Rarity::Common {
            return Rarity::Common;
        }
        match self.rarity_guarantee.as_mut() {
            None => {
                let floor = f64::from(cap.lowered().ordinal());
                let drawn = self.random.random_int(floor, f64::from(cap.ordinal())).round();
                Rarity::saturating_from_ordinal(drawn as u8)
            }
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                debug!(remaining = *remaining, rarity = %cap, "rarity guarantee consumed");
                cap
            }
            Some(_) => cap.lowered(),
        }
    }
}

impl fmt::Debug for Booster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Booster")
            .field("kind", &self.kind)
            .field("rarity", &self.rarity)
            .field("rarity_guarantee", &self.rarity_guarantee)
            .field("items_num_range", &self.items_num_range)
            .field("carry_loot_history", &self.carry_loot_history)
            .field("pool_size", &self.pool.len())
            .field("loot", &self.loot.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use booster_core::item::ItemType;
    use booster_test_support::{FixedRandom, SequenceRandom, pool_of};

    use crate::domain::settings::ItemCount;

    fn two_item_pool() -> Arc<ItemPool> {
        Arc::new(pool_of(&[
            ("ItemA", ItemType::Weapon),
            ("ItemB", ItemType::Shield),
        ]))
    }

    fn four_type_pool() -> Arc<ItemPool> {
        Arc::new(pool_of(&[
            ("Sword", ItemType::Weapon),
            ("Dagger", ItemType::Weapon),
            ("Spear", ItemType::Weapon),
            ("Buckler", ItemType::Shield),
            ("Cap", ItemType::Helmet),
            ("Mail", ItemType::Armor),
        ]))
    }

    fn settings(rarity: Rarity, count: ItemCount) -> BoosterSettings {
        BoosterSettings {
            rarity,
            items_num_range: count,
            ..BoosterSettings::default()
        }
    }

    fn seeded(
        booster_type: BoosterType,
        mut settings: BoosterSettings,
        pool: Arc<ItemPool>,
        seed: &str,
    ) -> Booster {
        settings.random_seed = Some(seed.to_owned());
        Booster::new(booster_type, settings, pool)
    }

    // --- dispatch ---

    #[test]
    fn test_booster_type_from_name_is_case_insensitive() {
        assert_eq!(BoosterType::from_name("LuckBooster"), BoosterType::LuckBooster);
        assert_eq!(BoosterType::from_name("UNIFORMBOOSTER"), BoosterType::UniformBooster);
        assert_eq!(
            BoosterType::from_name("collectionbooster"),
            BoosterType::CollectionBooster
        );
        assert_eq!(BoosterType::from_name("booster"), BoosterType::Booster);
    }

    #[test]
    fn test_unknown_booster_type_falls_back_to_basic() {
        assert_eq!(BoosterType::from_name("mysterybox"), BoosterType::Booster);
        assert_eq!(BoosterType::from_name(""), BoosterType::Booster);
    }

    #[test]
    fn test_kind_exposes_layered_policies() {
        let settings = BoosterSettings::default();
        let pool = two_item_pool();

        let basic = Booster::new(BoosterType::Booster, settings.clone(), Arc::clone(&pool));
        let luck = Booster::new(BoosterType::LuckBooster, settings.clone(), Arc::clone(&pool));
        let uniform = Booster::new(BoosterType::UniformBooster, settings.clone(), Arc::clone(&pool));
        let collection = Booster::new(BoosterType::CollectionBooster, settings, pool);

        assert!(basic.kind().luck().is_none());
        assert!(luck.kind().luck().is_some() && !luck.kind().covers_types());
        assert!(uniform.kind().covers_types() && uniform.kind().novelty().is_none());
        assert!(collection.kind().covers_types() && collection.kind().novelty().is_some());
        assert_eq!(collection.booster_type(), BoosterType::CollectionBooster);
    }

    // --- base booster ---

    #[test]
    fn test_empty_pool_yields_no_drops() {
        let mut booster = Booster::new(
            BoosterType::CollectionBooster,
            settings(Rarity::Legendary, ItemCount::Range(3.0, 9.0)),
            Arc::new(ItemPool::new()),
        );

        assert!(booster.open(None).unwrap().is_empty());
    }

    #[test]
    fn test_zero_count_yields_no_drops() {
        let mut booster = Booster::new(
            BoosterType::Booster,
            settings(Rarity::Rare, ItemCount::Exact(0.0)),
            two_item_pool(),
        );

        assert!(booster.open(None).unwrap().is_empty());
    }

    #[test]
    fn test_two_item_scenario_is_deterministic_for_seed() {
        let pool = two_item_pool();
        let config = settings(Rarity::Common, ItemCount::Range(2.0, 2.0));
        let mut first = seeded(BoosterType::Booster, config.clone(), Arc::clone(&pool), "fixed");
        let mut second = seeded(BoosterType::Booster, config, pool, "fixed");

        let a = first.open(None).unwrap();
        let b = second.open(None).unwrap();

        assert_eq!(a.len(), 2);
        assert!(a.iter().all(|item| item.rarity == Rarity::Common));
        assert!(a.iter().all(|item| item.id == 1 || item.id == 2));
        assert_eq!(a, b);
    }

    #[test]
    fn test_drop_count_stays_within_range() {
        let mut booster = seeded(
            BoosterType::Booster,
            settings(Rarity::Rare, ItemCount::Range(1.0, 5.0)),
            two_item_pool(),
            "count",
        );

        for _ in 0..200 {
            let drops = booster.open(None).unwrap();
            assert!((1..=5).contains(&drops.len()), "got {} drops", drops.len());
        }
    }

    #[test]
    fn test_item_count_is_rounded_draw() {
        // Count draw 0.6 over [1, 3] gives 2.2, which rounds to 2.
        let random = SequenceRandom::new(vec![0.6, 0.0, 0.0]);
        let mut booster = Booster::with_random(
            BoosterType::Booster,
            settings(Rarity::Common, ItemCount::Range(1.0, 3.0)),
            two_item_pool(),
            Box::new(random),
        );

        assert_eq!(booster.open(None).unwrap().len(), 2);
    }

    #[test]
    fn test_id_draw_precedes_rarity_draw() {
        // Draws: count, id (0.9 -> index 1), rarity (0.1 -> EPIC).
        let random = SequenceRandom::new(vec![0.0, 0.9, 0.1]);
        let mut booster = Booster::with_random(
            BoosterType::Booster,
            settings(Rarity::Legendary, ItemCount::Exact(1.0)),
            two_item_pool(),
            Box::new(random),
        );

        let drops = booster.open(None).unwrap();

        assert_eq!(drops.len(), 1);
        assert_eq!(drops[0].id, 2);
        assert_eq!(drops[0].rarity, Rarity::Epic);
    }

    #[test]
    fn test_rarity_without_guarantee_is_cap_or_one_below() {
        let mut booster = seeded(
            BoosterType::Booster,
            settings(Rarity::Epic, ItemCount::Exact(400.0)),
            two_item_pool(),
            "rarity",
        );

        let rarities: HashSet<Rarity> = booster
            .open(None)
            .unwrap()
            .iter()
            .map(|item| item.rarity)
            .collect();

        assert_eq!(rarities, HashSet::from([Rarity::Rare, Rarity::Epic]));
    }

    #[test]
    fn test_common_cap_always_drops_common() {
        let mut booster = Booster::with_random(
            BoosterType::Booster,
            settings(Rarity::Common, ItemCount::Exact(10.0)),
            two_item_pool(),
            Box::new(FixedRandom(0.99)),
        );

        let drops = booster.open(None).unwrap();

        assert_eq!(drops.len(), 10);
        assert!(drops.iter().all(|item| item.rarity == Rarity::Common));
    }

    #[test]
    fn test_guarantee_forces_cap_for_first_draws() {
        let mut config = settings(Rarity::Legendary, ItemCount::Exact(5.0));
        config.rarity_guarantee = Some(2);
        let mut booster = seeded(BoosterType::Booster, config, two_item_pool(), "guarantee");

        let rarities: Vec<Rarity> = booster
            .open(None)
            .unwrap()
            .iter()
            .map(|item| item.rarity)
            .collect();

        assert_eq!(
            rarities,
            vec![
                Rarity::Legendary,
                Rarity::Legendary,
                Rarity::Epic,
                Rarity::Epic,
                Rarity::Epic,
            ]
        );
        assert_eq!(booster.rarity_guarantee(), Some(0));
    }

    #[test]
    fn test_guarantee_is_not_reset_between_openings() {
        let mut config = settings(Rarity::Rare, ItemCount::Exact(2.0));
        config.rarity_guarantee = Some(3);
        let mut booster = seeded(BoosterType::Booster, config, two_item_pool(), "carry");

        let first: Vec<Rarity> = booster.open(None).unwrap().iter().map(|i| i.rarity).collect();
        let second: Vec<Rarity> = booster.open(None).unwrap().iter().map(|i| i.rarity).collect();

        assert_eq!(first, vec![Rarity::Rare, Rarity::Rare]);
        assert_eq!(second, vec![Rarity::Rare, Rarity::Common]);
    }

    #[test]
    fn test_zero_guarantee_always_drops_below_cap() {
        let mut config = settings(Rarity::Epic, ItemCount::Exact(6.0));
        config.rarity_guarantee = Some(0);
        let mut booster = seeded(BoosterType::Booster, config, two_item_pool(), "zero");

        let drops = booster.open(None).unwrap();

        assert!(drops.iter().all(|item| item.rarity == Rarity::Rare));
    }

    #[test]
    fn test_drops_are_copies_of_pool_items() {
        let pool = two_item_pool();
        let mut booster = seeded(
            BoosterType::LuckBooster,
            BoosterSettings {
                rarity: Rarity::Legendary,
                rarity_upgrade_chance: Some(1.0),
                items_num_range: ItemCount::Exact(20.0),
                ..BoosterSettings::default()
            },
            Arc::clone(&pool),
            "copies",
        );

        let drops = booster.open(None).unwrap();

        assert!(drops.iter().any(|item| item.rarity > Rarity::Common));
        assert!(pool.iter().all(|item| item.rarity == Rarity::Common));
        for drop in &drops {
            assert_eq!(pool.get(drop.id).map(|item| &item.name), Some(&drop.name));
        }
    }

    #[test]
    fn test_same_seed_same_config_same_output() {
        let config = BoosterSettings {
            rarity: Rarity::Epic,
            rarity_guarantee: Some(1),
            items_num_range: ItemCount::Range(3.0, 8.0),
            rarity_upgrade_chance: Some(0.3),
            new_item_chance_mul: Some(2.0),
            ..BoosterSettings::default()
        };
        let inventory = Inventory::from([(1, 3), (4, 1)]);
        let pool = four_type_pool();

        for booster_type in [
            BoosterType::Booster,
            BoosterType::LuckBooster,
            BoosterType::UniformBooster,
            BoosterType::CollectionBooster,
        ] {
            let mut first = seeded(booster_type, config.clone(), Arc::clone(&pool), "same");
            let mut second = seeded(booster_type, config.clone(), Arc::clone(&pool), "same");

            assert_eq!(
                first.open(Some(&inventory)).unwrap(),
                second.open(Some(&inventory)).unwrap(),
                "{booster_type} diverged"
            );
        }
    }

    // --- luck booster ---

    #[test]
    fn test_luck_booster_upgrades_after_base_draw() {
        // Draws: count, id, rarity (RARE cap -> round(0.2) = COMMON), then
        // level-1 coin with p = 0.5 hitting (centre 0.5, second draw 0.5).
        let random = SequenceRandom::new(vec![0.0, 0.0, 0.2, 0.5, 0.5]);
        let mut booster = Booster::with_random(
            BoosterType::LuckBooster,
            BoosterSettings {
                rarity: Rarity::Rare,
                rarity_upgrade_chance: Some(0.5),
                items_num_range: ItemCount::Exact(1.0),
                ..BoosterSettings::default()
            },
            two_item_pool(),
            Box::new(random),
        );

        let drops = booster.open(None).unwrap();

        assert_eq!(drops[0].rarity, Rarity::Rare);
    }

    #[test]
    fn test_luck_booster_upgrade_can_exceed_cap_but_not_legendary() {
        let mut booster = seeded(
            BoosterType::LuckBooster,
            BoosterSettings {
                rarity: Rarity::Rare,
                rarity_upgrade_chance: Some(0.9),
                items_num_range: ItemCount::Exact(300.0),
                ..BoosterSettings::default()
            },
            two_item_pool(),
            "lucky",
        );

        let drops = booster.open(None).unwrap();

        assert!(drops.iter().any(|item| item.rarity > Rarity::Rare));
        assert!(drops.iter().all(|item| item.rarity <= Rarity::Legendary));
    }

    // --- uniform booster ---

    #[test]
    fn test_uniform_booster_raises_minimum_count() {
        let booster = Booster::new(
            BoosterType::UniformBooster,
            settings(Rarity::Common, ItemCount::Range(1.0, 2.0)),
            two_item_pool(),
        );

        let range = booster.items_num_range();
        assert!((range.min() - 4.0).abs() < f64::EPSILON);
        assert!((range.max() - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_uniform_booster_covers_every_type_before_repeats() {
        for seed in ["a", "b", "c", "d", "e", "f", "g", "h"] {
            let mut booster = seeded(
                BoosterType::UniformBooster,
                settings(Rarity::Rare, ItemCount::Range(4.0, 8.0)),
                four_type_pool(),
                seed,
            );

            let drops = booster.open(None).unwrap();
            let first_four: HashSet<ItemType> =
                drops.iter().take(4).map(|item| item.item_type).collect();

            assert_eq!(first_four.len(), 4, "seed {seed} repeated a type early");
        }
    }

    #[test]
    fn test_uniform_booster_resets_coverage_each_opening() {
        let mut booster = seeded(
            BoosterType::UniformBooster,
            settings(Rarity::Common, ItemCount::Exact(4.0)),
            four_type_pool(),
            "reset",
        );

        for _ in 0..5 {
            let drops = booster.open(None).unwrap();
            let types: HashSet<ItemType> = drops.iter().map(|item| item.item_type).collect();
            assert_eq!(types.len(), 4);
            assert_eq!(booster.loot_history().len(), 4);
        }
    }

    #[test]
    fn test_carried_history_spans_openings() {
        let mut booster = seeded(
            BoosterType::UniformBooster,
            BoosterSettings {
                items_num_range: ItemCount::Exact(4.0),
                carry_loot_history: true,
                ..BoosterSettings::default()
            },
            four_type_pool(),
            "carry",
        );

        let first = booster.open(None).unwrap();
        let second = booster.open(None).unwrap();

        assert_eq!(first.len(), 4);
        assert_eq!(second.len(), 4);
        assert_eq!(booster.loot_history().len(), 8);
        assert_eq!(&booster.loot_history()[..4], first.as_slice());
    }

    /// Draws for the three luck coins of a COMMON drop at chance 0; none hits.
    const MISSED_COINS: [f64; 6] = [0.0, 0.5, 0.0, 0.5, 0.0, 0.5];

    /// A four-drop booster replaying `openings`: per opening the count draw,
    /// then per drop its pick draw followed by the missed luck coins.
    fn scripted_booster(
        booster_type: BoosterType,
        pool: Arc<ItemPool>,
        carry_loot_history: bool,
        openings: &[[f64; 4]],
    ) -> Booster {
        let mut values = Vec::new();
        for picks in openings {
            values.push(0.0);
            for pick in picks {
                values.push(*pick);
                values.extend(MISSED_COINS);
            }
        }
        Booster::with_random(
            booster_type,
            BoosterSettings {
                items_num_range: ItemCount::Exact(4.0),
                rarity_upgrade_chance: Some(0.0),
                carry_loot_history,
                ..BoosterSettings::default()
            },
            pool,
            Box::new(SequenceRandom::new(values)),
        )
    }

    fn open_ids(booster: &mut Booster) -> Vec<u32> {
        booster
            .open(Some(&Inventory::new()))
            .unwrap()
            .iter()
            .map(|item| item.id)
            .collect()
    }

    fn weapon_pair() -> Arc<ItemPool> {
        Arc::new(pool_of(&[("X", ItemType::Weapon), ("Y", ItemType::Weapon)]))
    }

    fn two_weapons_and_shield() -> Arc<ItemPool> {
        Arc::new(pool_of(&[
            ("Sword", ItemType::Weapon),
            ("Axe", ItemType::Weapon),
            ("Buckler", ItemType::Shield),
        ]))
    }

    #[test]
    fn test_carried_history_counts_earlier_drops_as_owned() {
        let pool = weapon_pair();
        let mut booster = scripted_booster(
            BoosterType::CollectionBooster,
            Arc::clone(&pool),
            true,
            &[[0.1; 4], [0.4, 0.5, 0.5, 0.5]],
        );

        let first = open_ids(&mut booster);
        let candidates: Vec<&Item> = pool.iter().collect();
        let weights =
            NoveltyPolicy::new(None).weights(&candidates, &Inventory::new(), booster.loot_history());
        let second = open_ids(&mut booster);

        assert_eq!(first, vec![1, 1, 1, 1]);
        // X owned four times, Y never: M = 5, raw weights [1, 5].
        assert!((weights[0] - 1.0 / 6.0).abs() < 1e-12);
        assert!((weights[1] - 5.0 / 6.0).abs() < 1e-12);
        // 0.4 lands past 1/6, and Y stays favoured while X leads.
        assert_eq!(second, vec![2, 2, 2, 2]);
        assert_eq!(booster.loot_history().len(), 8);
    }

    #[test]
    fn test_default_history_resets_owned_counts_each_opening() {
        let mut booster = scripted_booster(
            BoosterType::CollectionBooster,
            weapon_pair(),
            false,
            &[[0.1; 4], [0.4, 0.5, 0.5, 0.5]],
        );

        let first = open_ids(&mut booster);
        let second = open_ids(&mut booster);

        assert_eq!(first, vec![1, 1, 1, 1]);
        // Weights restart at [1/2, 1/2], so 0.4 picks X again, then
        // [1/3, 2/3] -> Y, [1/2, 1/2] -> Y, [2/3, 1/3] -> X.
        assert_eq!(second, vec![1, 2, 2, 1]);
        assert_eq!(booster.loot_history().len(), 4);
    }

    #[test]
    fn test_carried_history_lifts_type_coverage_in_next_opening() {
        let mut booster = scripted_booster(
            BoosterType::UniformBooster,
            two_weapons_and_shield(),
            true,
            &[[0.0; 4], [0.5; 4]],
        );

        let first = open_ids(&mut booster);
        let second = open_ids(&mut booster);

        assert_eq!(first, vec![1, 3, 1, 1]);
        // Both types already dropped, so every pick sees the full pool and
        // 0.5 always rounds to the middle item.
        assert_eq!(second, vec![2, 2, 2, 2]);
    }

    #[test]
    fn test_default_history_restores_type_coverage_each_opening() {
        let mut booster = scripted_booster(
            BoosterType::UniformBooster,
            two_weapons_and_shield(),
            false,
            &[[0.0; 4], [0.5; 4]],
        );

        let first = open_ids(&mut booster);
        let second = open_ids(&mut booster);

        assert_eq!(first, vec![1, 3, 1, 1]);
        // After the Axe the only missing type is the shield.
        assert_eq!(second, vec![2, 3, 2, 2]);
    }

    #[test]
    fn test_uniform_narrowing_leaves_shared_pool_intact() {
        let pool = four_type_pool();
        let before = (*pool).clone();
        let mut booster = seeded(
            BoosterType::UniformBooster,
            settings(Rarity::Common, ItemCount::Exact(6.0)),
            Arc::clone(&pool),
            "pool",
        );

        booster.open(None).unwrap();

        assert_eq!(*pool, before);
        assert_eq!(booster.pool().len(), 6);
    }

    // --- collection booster ---

    #[test]
    fn test_collection_booster_requires_inventory() {
        let mut booster = Booster::new(
            BoosterType::CollectionBooster,
            BoosterSettings::default(),
            two_item_pool(),
        );

        match booster.open(None) {
            Err(DomainError::Validation(msg)) => assert!(msg.contains("inventory")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_collection_booster_favors_unowned_items() {
        // Single-type pool so type coverage never narrows the draw.
        let pool = Arc::new(pool_of(&[("X", ItemType::Weapon), ("Y", ItemType::Weapon)]));
        let inventory = Inventory::from([(1, 20)]);
        let mut booster = seeded(
            BoosterType::CollectionBooster,
            settings(Rarity::Common, ItemCount::Exact(4.0)),
            pool,
            "novelty",
        );

        let mut owned_x = 0;
        let mut unowned_y = 0;
        for _ in 0..500 {
            for drop in booster.open(Some(&inventory)).unwrap() {
                if drop.id == 1 {
                    owned_x += 1;
                } else {
                    unowned_y += 1;
                }
            }
        }

        assert!(
            unowned_y > owned_x * 4,
            "expected Y to dominate, got X={owned_x} Y={unowned_y}"
        );
    }

    #[test]
    fn test_collection_booster_counts_current_loot() {
        // Draws: the count, then per item one weighted pick followed by three
        // luck coins at p = 0 (two draws each, never hit). A COMMON cap
        // draws no rarity.
        let pool = Arc::new(pool_of(&[("X", ItemType::Weapon), ("Y", ItemType::Weapon)]));
        let random = SequenceRandom::new(vec![
            0.0, // count
            0.1, // pick: weights [1/2, 1/2] -> X
            0.0, 0.5, 0.0, 0.5, 0.0, 0.5, // three luck coins, all miss
            0.6, // pick: X owned once -> weights [1/3, 2/3] -> Y
            0.0, 0.5, 0.0, 0.5, 0.0, 0.5,
            0.4, // pick: both owned once -> weights [1/2, 1/2] -> X
            0.0, 0.5, 0.0, 0.5, 0.0, 0.5,
            0.3, // pick: X twice, Y once -> weights [1/3, 2/3] -> X
            0.0, 0.5, 0.0, 0.5, 0.0, 0.5,
        ]);
        let mut booster = Booster::with_random(
            BoosterType::CollectionBooster,
            BoosterSettings {
                items_num_range: ItemCount::Exact(4.0),
                rarity_upgrade_chance: Some(0.0),
                ..BoosterSettings::default()
            },
            pool,
            Box::new(random),
        );

        let ids: Vec<u32> = booster
            .open(Some(&Inventory::new()))
            .unwrap()
            .iter()
            .map(|item| item.id)
            .collect();

        assert_eq!(ids, vec![1, 2, 1, 1]);
    }
}
