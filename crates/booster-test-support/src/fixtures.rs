//! Item and pool fixtures.

use booster_core::item::{Item, ItemId, ItemPool, ItemType, Rarity};

/// Builds a common-rarity item.
#[must_use]
pub fn item(id: ItemId, name: &str, item_type: ItemType) -> Item {
    Item::new(id, name, item_type, Rarity::Common)
}

/// Builds a pool from `(name, type)` pairs, assigning IDs from 1 in order.
#[must_use]
pub fn pool_of(entries: &[(&str, ItemType)]) -> ItemPool {
    (1..)
        .zip(entries)
        .map(|(id, (name, item_type))| item(id, name, *item_type))
        .collect()
}
