//! Command handlers for the booster context.
//!
//! This module contains the application-level entry points collaborators
//! call: resolve a type name and construct a booster, open a booster against
//! an inventory, and instantiate a whole catalog of definitions.

use std::sync::Arc;

use booster_core::error::DomainError;
use booster_core::item::{Inventory, Item, ItemPool};
use tracing::{info, instrument};

use crate::domain::booster::{Booster, BoosterType};
use crate::domain::settings::BoosterSettings;

/// A booster definition from a catalog: its type and its settings.
#[derive(Debug, Clone, PartialEq)]
pub struct BoosterDefinition {
    /// Resolved booster type.
    pub booster_type: BoosterType,
    /// Settings for this booster.
    pub settings: BoosterSettings,
}

/// A constructed booster with its catalog position.
#[derive(Debug)]
pub struct CatalogBooster {
    /// Sequential identifier, starting at 1.
    pub id: u32,
    /// The booster.
    pub booster: Booster,
}

/// Handles construction: resolves `booster_type` by name and builds a
/// booster drawing from `pool`.
#[instrument(skip(settings, pool), fields(pool_size = pool.len()))]
pub fn handle_construct(booster_type: &str, settings: BoosterSettings, pool: Arc<ItemPool>) -> Booster {
    let resolved = BoosterType::from_name(booster_type);
    info!(%resolved, rarity = %settings.rarity, "constructing booster");
    Booster::new(resolved, settings, pool)
}

/// Handles an opening: opens `booster` against `inventory`.
///
/// # Errors
///
/// Returns `DomainError` if the opening fails (see [`Booster::open`]).
#[instrument(skip(booster, inventory), fields(booster_type = %booster.booster_type()))]
pub fn handle_open(
    booster: &mut Booster,
    inventory: Option<&Inventory>,
) -> Result<Vec<Item>, DomainError> {
    let drops = booster.open(inventory)?;
    info!(drops = drops.len(), "booster opened");
    Ok(drops)
}

/// Builds every definition in order over one shared pool, numbering the
/// boosters from 1 and overlaying `common` onto each definition's settings.
#[instrument(skip_all, fields(pool_size = pool.len()))]
pub fn handle_build_catalog(
    definitions: Vec<BoosterDefinition>,
    common: &BoosterSettings,
    pool: &Arc<ItemPool>,
) -> Vec<CatalogBooster> {
    let boosters: Vec<CatalogBooster> = (1..)
        .zip(definitions)
        .map(|(id, definition)| CatalogBooster {
            id,
            booster: Booster::new(
                definition.booster_type,
                definition.settings.merged_with(common),
                Arc::clone(pool),
            ),
        })
        .collect();
    info!(boosters = boosters.len(), "booster catalog built");
    boosters
}
