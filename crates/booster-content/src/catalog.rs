//! Catalog parsing.
//!
//! Item catalogs are a flat list of `{ name, itemType, rarity? }` records;
//! IDs are assigned from 1 in list order. Booster catalogs are an ordered
//! list of `{ type, boosters: [...] }` groups, one per booster type name.

use std::fs;
use std::path::Path;

use booster_core::item::{Item, ItemPool, ItemType, Rarity};
use booster_loot::application::command_handlers::BoosterDefinition;
use booster_loot::domain::booster::BoosterType;
use booster_loot::domain::settings::{BoosterSettings, ItemCount};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::ContentError;

/// Supported catalog encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    /// `.json`
    Json,
    /// `.yaml` or `.yml`
    Yaml,
}

impl CatalogFormat {
    /// Chooses a format from the file extension.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::UnsupportedFormat` for any other extension.
    pub fn from_path(path: &Path) -> Result<Self, ContentError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(ContentError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawItem {
    name: String,
    #[serde(alias = "itemType")]
    item_type: String,
    #[serde(default)]
    rarity: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawBoosterGroup {
    #[serde(rename = "type")]
    booster_type: String,
    #[serde(default)]
    boosters: Vec<RawBooster>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawBooster {
    rarity: Option<String>,
    #[serde(alias = "rarity_guarant")]
    rarity_guarantee: Option<i64>,
    items_num_range: Option<ItemCount>,
    rarity_upgrade_chance: Option<f64>,
    new_item_chance_mul: Option<f64>,
    random_seed: Option<String>,
    carry_loot_history: bool,
}

impl RawBooster {
    fn into_settings(self) -> BoosterSettings {
        BoosterSettings {
            random_seed: self.random_seed,
            rarity: parse_rarity(self.rarity.as_deref()),
            rarity_guarantee: self.rarity_guarantee.map(clamp_guarantee),
            items_num_range: self.items_num_range.unwrap_or_default(),
            rarity_upgrade_chance: self.rarity_upgrade_chance,
            new_item_chance_mul: self.new_item_chance_mul,
            carry_loot_history: self.carry_loot_history,
        }
    }
}

/// Negative guarantees behave like 0; oversized ones saturate.
fn clamp_guarantee(given: i64) -> u32 {
    let used = u32::try_from(given.max(0)).unwrap_or(u32::MAX);
    if i64::from(used) != given {
        warn!(
            field = "rarity_guarantee",
            given,
            used,
            "config value clamped"
        );
    }
    used
}

fn parse_rarity(name: Option<&str>) -> Rarity {
    let rarity = Rarity::from_name(name);
    if let Some(name) = name
        && rarity == Rarity::Common
        && !name.trim().eq_ignore_ascii_case(Rarity::Common.as_str())
    {
        warn!(rarity = name, "unrecognized rarity, using COMMON");
    }
    rarity
}

fn parse<T: DeserializeOwned>(source: &str, format: CatalogFormat) -> Result<T, ContentError> {
    Ok(match format {
        CatalogFormat::Json => serde_json::from_str(source)?,
        CatalogFormat::Yaml => serde_yaml::from_str(source)?,
    })
}

fn read(path: &Path) -> Result<String, ContentError> {
    fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses an item catalog into a pool.
///
/// # Errors
///
/// Returns `ContentError::Json`/`Yaml` for malformed input and
/// `ContentError::UnknownItemType` for an unrecognized category.
pub fn parse_items(source: &str, format: CatalogFormat) -> Result<ItemPool, ContentError> {
    let raw: Vec<RawItem> = parse(source, format)?;
    let pool = (1..)
        .zip(raw)
        .map(|(id, item)| {
            let item_type =
                ItemType::parse(&item.item_type).ok_or_else(|| ContentError::UnknownItemType {
                    name: item.name.clone(),
                    item_type: item.item_type.clone(),
                })?;
            Ok(Item::new(
                id,
                item.name,
                item_type,
                parse_rarity(item.rarity.as_deref()),
            ))
        })
        .collect::<Result<ItemPool, ContentError>>()?;
    debug!(items = pool.len(), "item catalog parsed");
    Ok(pool)
}

/// Parses a booster catalog into definitions, in catalog order.
///
/// # Errors
///
/// Returns `ContentError::Json`/`Yaml` for malformed input.
pub fn parse_boosters(
    source: &str,
    format: CatalogFormat,
) -> Result<Vec<BoosterDefinition>, ContentError> {
    let groups: Vec<RawBoosterGroup> = parse(source, format)?;
    let definitions: Vec<BoosterDefinition> = groups
        .into_iter()
        .flat_map(|group| {
            let booster_type = BoosterType::from_name(&group.booster_type);
            group
                .boosters
                .into_iter()
                .map(move |raw| BoosterDefinition {
                    booster_type,
                    settings: raw.into_settings(),
                })
        })
        .collect();
    debug!(boosters = definitions.len(), "booster catalog parsed");
    Ok(definitions)
}

/// Reads and parses the item catalog at `path`.
///
/// # Errors
///
/// Returns `ContentError` if the file cannot be read or parsed.
pub fn load_items(path: &Path) -> Result<ItemPool, ContentError> {
    let format = CatalogFormat::from_path(path)?;
    parse_items(&read(path)?, format)
}

/// Reads and parses the booster catalog at `path`.
///
/// # Errors
///
/// Returns `ContentError` if the file cannot be read or parsed.
pub fn load_boosters(path: &Path) -> Result<Vec<BoosterDefinition>, ContentError> {
    let format = CatalogFormat::from_path(path)?;
    parse_boosters(&read(path)?, format)
}
