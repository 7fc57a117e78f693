//! JSON documents written at the end of a run
//!
//! All documents are keyed maps (sorted keys), pretty printed with a
//! two-space indent and a trailing newline.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::battle_types::EXPORT_PREFIX;
use crate::maps::GameMap;
use crate::vehicles::Vehicle;
use crate::{Error, Result};

pub const VEHICLES_FILE: &str = "vehicles.json";
pub const MAPS_FILE: &str = "maps.json";
pub const BATTLE_TYPES_FILE: &str = "battle_types.json";
pub const VERSION_FILE: &str = "version.json";
pub const LOCALE_STRINGS_FILE: &str = "strings.json";

/// Names per locale
pub type Names = BTreeMap<String, String>;

/// Drop every locale whose name is identical to the reference locale's
///
/// The reference entry itself is kept. Without a reference entry nothing is
/// dropped.
pub fn reduce_names(names: &Names, reference: &str) -> Names {
    let Some(reference_name) = names.get(reference) else {
        return names.clone();
    };

    names
        .iter()
        .filter(|(locale, name)| locale.as_str() == reference || *name != reference_name)
        .map(|(locale, name)| (locale.clone(), name.clone()))
        .collect()
}

/// Vehicles keyed by id, with reduced names
pub fn vehicles_document(vehicles: &BTreeMap<String, Vehicle>, reference: &str) -> BTreeMap<String, Vehicle> {
    vehicles
        .values()
        .map(|vehicle| {
            let mut vehicle = vehicle.clone();
            vehicle.names = reduce_names(&vehicle.names, reference);
            (vehicle.id.clone(), vehicle)
        })
        .collect()
}

/// Maps re-keyed from internal key to id, with reduced names
pub fn maps_document(maps: &BTreeMap<String, GameMap>, reference: &str) -> BTreeMap<String, GameMap> {
    let mut document = BTreeMap::new();
    for map in maps.values() {
        let mut map = map.clone();
        map.names = reduce_names(&map.names, reference);
        if let Some(previous) = document.insert(map.id.clone(), map) {
            warn!(id = %previous.id, key = %previous.key, "Duplicate map id, keeping the later key");
        }
    }
    document
}

/// Battle types keyed `game_mode_<name>`, with reduced names
pub fn battle_types_document(
    battle_types: &BTreeMap<String, Names>,
    reference: &str,
) -> BTreeMap<String, Names> {
    battle_types
        .iter()
        .map(|(name, names)| (format!("{EXPORT_PREFIX}{name}"), reduce_names(names, reference)))
        .collect()
}

/// Every name known in one locale
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleStrings {
    pub vehicles: BTreeMap<String, String>,
    pub maps: BTreeMap<String, String>,
    pub battle_types: BTreeMap<String, String>,
}

/// Per-locale string catalogs from unreduced names
pub fn locale_catalogs(
    vehicles: &BTreeMap<String, Vehicle>,
    maps: &BTreeMap<String, GameMap>,
    battle_types: &BTreeMap<String, Names>,
) -> BTreeMap<String, LocaleStrings> {
    let mut catalogs: BTreeMap<String, LocaleStrings> = BTreeMap::new();

    for vehicle in vehicles.values() {
        for (locale, name) in &vehicle.names {
            catalogs
                .entry(locale.clone())
                .or_default()
                .vehicles
                .insert(vehicle.id.clone(), name.clone());
        }
    }
    for map in maps.values() {
        for (locale, name) in &map.names {
            catalogs
                .entry(locale.clone())
                .or_default()
                .maps
                .insert(map.id.clone(), name.clone());
        }
    }
    for (battle_type, names) in battle_types {
        for (locale, name) in names {
            catalogs
                .entry(locale.clone())
                .or_default()
                .battle_types
                .insert(format!("{EXPORT_PREFIX}{battle_type}"), name.clone());
        }
    }

    catalogs
}

/// Write `value` as pretty JSON, creating parent directories
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    fs::write(path, json).map_err(|e| Error::io(path, e))
}

/// What an export wrote
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    pub vehicles: usize,
    pub maps: usize,
    pub battle_types: usize,
    pub locales: usize,
    pub files: Vec<PathBuf>,
}
