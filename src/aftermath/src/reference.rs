//! Reference vehicle catalog
//!
//! Externally supplied attributes keyed by global vehicle id. The vehicle
//! identity pass falls back to these when the game files leave a field
//! empty, and seeds display names from them.
//!
//! Two input shapes are accepted:
//!
//! - the precomputed catalog, one object per id:
//!   `{"3089": {"tier": 3, "class": "lightTank", "premium": false, "names": {"en": "..."}}}`
//! - a per-locale encyclopedia response:
//!   `{"data": {"3089": {"tank_id": 3089, "tier": 3, "type": "lightTank", "is_premium": false, "name": "..."}}}`

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Locale, Result};

/// Attributes known for one vehicle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    #[serde(default)]
    pub tier: u32,
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub premium: bool,
    /// Display name per locale tag
    #[serde(default)]
    pub names: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceCatalog {
    entries: HashMap<String, ReferenceEntry>,
}

#[derive(Deserialize)]
struct EncyclopediaResponse {
    #[serde(default)]
    data: HashMap<String, Option<EncyclopediaVehicle>>,
}

#[derive(Deserialize)]
struct EncyclopediaVehicle {
    tank_id: u64,
    #[serde(default)]
    tier: u32,
    #[serde(default, rename = "type")]
    class: String,
    #[serde(default)]
    is_premium: bool,
    #[serde(default)]
    name: String,
}

impl ReferenceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a precomputed catalog file
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json_str(&json)
    }

    /// Parse a precomputed catalog; locale keys are normalized (`zh-cn` -> `zh-CN`)
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: HashMap<String, ReferenceEntry> = serde_json::from_str(json)?;

        let mut entries = HashMap::with_capacity(raw.len());
        for (id, mut entry) in raw {
            entry.names = entry
                .names
                .into_iter()
                .map(|(tag, name)| Ok((tag.parse::<Locale>()?.to_string(), name)))
                .collect::<Result<_>>()?;
            entries.insert(id, entry);
        }

        Ok(Self { entries })
    }

    /// Merge one locale's encyclopedia response
    ///
    /// Scalar attributes are overwritten by every merge; the name is stored
    /// under `locale`. Returns the number of vehicles merged.
    pub fn merge_encyclopedia(&mut self, locale: &Locale, json: &str) -> Result<usize> {
        let response: EncyclopediaResponse = serde_json::from_str(json)?;
        let tag = locale.to_string();

        let mut merged = 0;
        for vehicle in response.data.into_values().flatten() {
            let entry = self.entries.entry(vehicle.tank_id.to_string()).or_default();
            entry.tier = vehicle.tier;
            entry.class = vehicle.class;
            entry.premium = vehicle.is_premium;
            if !vehicle.name.is_empty() {
                entry.names.insert(tag.clone(), vehicle.name);
            }
            merged += 1;
        }

        Ok(merged)
    }

    pub fn get(&self, id: &str) -> Option<&ReferenceEntry> {
        self.entries.get(id)
    }

    pub fn insert(&mut self, id: impl Into<String>, entry: ReferenceEntry) {
        self.entries.insert(id.into(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
