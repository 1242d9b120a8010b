//! Opening every catalog booster and rendering the result.

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;

use booster_content::catalog::{load_boosters, load_items};
use booster_core::item::{Inventory, Item, ItemId, Rarity};
use booster_core::rng::{RandomSource, random_source_for};
use booster_loot::application::command_handlers::{
    CatalogBooster, handle_build_catalog, handle_open,
};
use booster_loot::domain::settings::BoosterSettings;
use serde::Serialize;
use tracing::{info, instrument};

use crate::config::{CliConfig, OutputFormat, SortKey};
use crate::error::AppError;

const RULE_WIDTH: usize = 80;

/// Rolls a player inventory: IDs from 1 upward while the ID stays below a
/// bound redrawn from `[3, 16)` on every step, each with a quantity of
/// `round(random_int(1, 5))`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn random_inventory(random: &mut dyn RandomSource) -> Inventory {
    let mut inventory = Inventory::new();
    let mut id: ItemId = 1;
    while f64::from(id) < random.random_int(3.0, 16.0) {
        let quantity = random.random_int(1.0, 5.0).round() as u32;
        inventory.insert(id, quantity);
        id += 1;
    }
    inventory
}

/// Orders `loot` by name, then stably by `key`.
pub fn sort_loot(loot: &mut [Item], key: SortKey) {
    loot.sort_by(|a, b| a.name.cmp(&b.name));
    match key {
        SortKey::Name => {}
        SortKey::Rarity => loot.sort_by_key(|item| item.rarity),
        SortKey::Type => loot.sort_by_key(|item| item.item_type),
        SortKey::Id => loot.sort_by_key(|item| item.id),
    }
}

/// One booster's settings and the drops of its opening.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoosterReport {
    /// Catalog position, starting at 1.
    pub id: u32,
    /// Type name the booster was built from.
    pub booster_type: &'static str,
    /// Rarity cap.
    pub rarity: Rarity,
    /// Guaranteed draws left before the opening.
    pub rarity_guarantee: Option<u32>,
    /// Upgrade chance, for luck-aware types.
    pub rarity_upgrade_chance: Option<f64>,
    /// Normalized `[min, max]` drop count.
    pub items_num_range: [f64; 2],
    /// Sorted drops.
    pub loot: Vec<Item>,
}

/// A full run: the inventory every booster was opened against and each
/// booster's drops.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Seed shared by the run, if any.
    pub seed: Option<String>,
    /// Rolled player inventory, by item ID.
    pub inventory: BTreeMap<ItemId, u32>,
    /// Boosters in catalog order.
    pub boosters: Vec<BoosterReport>,
}

/// Opens every booster in `catalog` against `inventory`, in order.
///
/// # Errors
///
/// Returns `AppError::Domain` if an opening fails.
pub fn open_catalog(
    catalog: Vec<CatalogBooster>,
    inventory: &Inventory,
    sort_by: SortKey,
) -> Result<Vec<BoosterReport>, AppError> {
    catalog
        .into_iter()
        .map(|CatalogBooster { id, mut booster }| {
            let range = booster.items_num_range();
            let rarity_guarantee = booster.rarity_guarantee();
            let mut loot = handle_open(&mut booster, Some(inventory))?;
            sort_loot(&mut loot, sort_by);
            Ok(BoosterReport {
                id,
                booster_type: booster.booster_type().as_str(),
                rarity: booster.rarity(),
                rarity_guarantee,
                rarity_upgrade_chance: booster.kind().luck().map(|luck| luck.upgrade_chance()),
                items_num_range: [range.min(), range.max()],
                loot,
            })
        })
        .collect()
}

/// Loads both catalogs, rolls an inventory and opens every booster.
///
/// # Errors
///
/// Returns `AppError::Content` if a catalog cannot be loaded and
/// `AppError::Domain` if an opening fails.
#[instrument(skip_all, fields(seed = config.seed.as_deref().unwrap_or("")))]
pub fn build_report(config: &CliConfig) -> Result<RunReport, AppError> {
    let pool = Arc::new(load_items(&config.items_path)?);
    let definitions = load_boosters(&config.catalog_path)?;
    let common = BoosterSettings {
        random_seed: config.seed.clone(),
        ..BoosterSettings::default()
    };
    let catalog = handle_build_catalog(definitions, &common, &pool);

    let mut random = random_source_for(config.seed.as_deref());
    let inventory = random_inventory(random.as_mut());
    info!(
        items = pool.len(),
        boosters = catalog.len(),
        owned = inventory.len(),
        "opening catalog"
    );

    let boosters = open_catalog(catalog, &inventory, config.sort_by)?;
    Ok(RunReport {
        seed: config.seed.clone(),
        inventory: inventory.into_iter().collect(),
        boosters,
    })
}

/// Writes `report` as `||`-prefixed text.
///
/// # Errors
///
/// Returns `AppError::Io` if writing fails.
pub fn render_text(report: &RunReport, out: &mut impl Write) -> Result<(), AppError> {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(out, "{rule}")?;
    writeln!(out, "|| Seed: {}", report.seed.as_deref().unwrap_or("none"))?;
    writeln!(out, "|| Inventory:")?;
    let owned: Vec<String> = report
        .inventory
        .iter()
        .map(|(id, quantity)| format!("{id}: {quantity}"))
        .collect();
    writeln!(out, "|| {{{}}}", owned.join(", "))?;
    writeln!(out, "{rule}")?;

    for booster in &report.boosters {
        writeln!(out, "|| Booster pack #{} ({}):", booster.id, booster.booster_type)?;
        writeln!(out, "|| Settings:")?;
        writeln!(out, "|| --- Rarity: {}", booster.rarity)?;
        match booster.rarity_guarantee {
            Some(remaining) => writeln!(out, "|| --- Rarity guarantee: {remaining}")?,
            None => writeln!(out, "|| --- Rarity guarantee: none")?,
        }
        if let Some(chance) = booster.rarity_upgrade_chance {
            writeln!(out, "|| --- Rarity upgrade chance: {}%", chance * 100.0)?;
        }
        let [min, max] = booster.items_num_range;
        writeln!(out, "|| --- Item count range: {min}-{max}")?;
        for (position, item) in booster.loot.iter().enumerate() {
            writeln!(
                out,
                "|| ({}): #{} {} [{} {}]",
                position + 1,
                item.id,
                item.name,
                item.item_type,
                item.rarity
            )?;
        }
        writeln!(out, "||")?;
    }

    writeln!(out, "{rule}")?;
    Ok(())
}

/// Builds the report for `config` and writes it to `out` in the configured
/// format.
///
/// # Errors
///
/// Returns `AppError` if loading, opening or writing fails.
pub fn run(config: &CliConfig, out: &mut impl Write) -> Result<(), AppError> {
    let report = build_report(config)?;
    match config.output {
        OutputFormat::Text => render_text(&report, out)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
