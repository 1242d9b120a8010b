//! Item catalog, rarity tiers and player inventory.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Serialize;

/// Numeric item identifier.
pub type ItemId = u32;

/// Owned quantity per item, keyed by item ID.
pub type Inventory = HashMap<ItemId, u32>;

/// Rarity tiers, ordered from most to least common.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rarity {
    /// The lowest tier.
    #[default]
    Common,
    /// One tier above common.
    Rare,
    /// One tier above rare.
    Epic,
    /// The highest tier.
    Legendary,
}

impl Rarity {
    /// Every tier, in ordinal order.
    pub const ALL: [Rarity; 4] = [
        Rarity::Common,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];

    /// The highest representable tier.
    pub const MAX: Rarity = Rarity::Legendary;

    /// Returns the ordinal of this tier (`Common` is 0).
    #[must_use]
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Returns the tier at `ordinal`, saturating at [`Rarity::MAX`].
    #[must_use]
    pub fn saturating_from_ordinal(ordinal: u8) -> Self {
        Self::ALL
            .get(usize::from(ordinal))
            .copied()
            .unwrap_or(Self::MAX)
    }

    /// Parses a rarity name case-insensitively. Unrecognized or missing names
    /// fall back to `Common`.
    #[must_use]
    pub fn from_name(name: Option<&str>) -> Self {
        let Some(name) = name else {
            return Self::Common;
        };
        Self::ALL
            .into_iter()
            .find(|rarity| rarity.as_str().eq_ignore_ascii_case(name.trim()))
            .unwrap_or_default()
    }

    /// The tier directly below this one, or `Common` for `Common`.
    #[must_use]
    pub fn lowered(self) -> Self {
        Self::saturating_from_ordinal(self.ordinal().saturating_sub(1))
    }

    /// The tier `levels` above this one, saturating at [`Rarity::MAX`].
    #[must_use]
    pub fn raised(self, levels: u8) -> Self {
        Self::saturating_from_ordinal(self.ordinal().saturating_add(levels))
    }

    /// Upper-case display name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Rarity::Common => "COMMON",
            Rarity::Rare => "RARE",
            Rarity::Epic => "EPIC",
            Rarity::Legendary => "LEGENDARY",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Equipment categories an item can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemType {
    /// Uncategorized.
    Unknown,
    /// Head slot.
    Helmet,
    /// Main hand.
    Weapon,
    /// Off hand.
    Shield,
    /// Body slot.
    Armor,
}

impl ItemType {
    /// Every category, in ordinal order.
    pub const ALL: [ItemType; 5] = [
        ItemType::Unknown,
        ItemType::Helmet,
        ItemType::Weapon,
        ItemType::Shield,
        ItemType::Armor,
    ];

    /// Number of categories.
    pub const COUNT: usize = Self::ALL.len();

    /// Parses a category name case-insensitively.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|item_type| item_type.as_str().eq_ignore_ascii_case(name.trim()))
    }

    /// Upper-case display name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Unknown => "UNKNOWN",
            ItemType::Helmet => "HELMET",
            ItemType::Weapon => "WEAPON",
            ItemType::Shield => "SHIELD",
            ItemType::Armor => "ARMOR",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog entry, or a dropped copy of one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    /// Catalog identifier.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Rarity of this record.
    pub rarity: Rarity,
    /// Equipment category.
    pub item_type: ItemType,
}

impl Item {
    /// Creates a new item record.
    #[must_use]
    pub fn new(id: ItemId, name: impl Into<String>, item_type: ItemType, rarity: Rarity) -> Self {
        Self {
            id,
            name: name.into(),
            rarity,
            item_type,
        }
    }

    /// Returns a copy of this item carrying `rarity`.
    #[must_use]
    pub fn with_rarity(&self, rarity: Rarity) -> Self {
        Self {
            rarity,
            ..self.clone()
        }
    }
}

/// The items a booster may drop, iterated in ascending ID order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPool {
    items: BTreeMap<ItemId, Item>,
}

impl ItemPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `item`, replacing and returning any item with the same ID.
    pub fn insert(&mut self, item: Item) -> Option<Item> {
        self.items.insert(item.id, item)
    }

    /// Looks up an item by ID.
    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    /// Number of items in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the pool holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates items in ascending ID order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }
}

impl FromIterator<Item> for ItemPool {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(|item| (item.id, item)).collect(),
        }
    }
}
