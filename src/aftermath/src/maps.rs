//! Map records
//!
//! The dictionary (`maps.yaml`) lists every map under its internal key:
//!
//! ```yaml
//! maps:
//!   faust:
//!     id: 5
//!     localName: Faust
//!     availableModes: [1, 2]
//!     supremacyPointsThreshold: 300
//! ```
//!
//! Localization tables name a map under `#maps:<key>:<localName>`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::extractor::Extractor;
use crate::strings::{LocalizedStrings, StringsMatcher};
use crate::table::Table;
use crate::Result;

pub const DICTIONARY_FILE: &str = "maps.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMap {
    pub id: String,
    pub key: String,
    pub available_modes: Vec<u32>,
    pub supremacy_points_threshold: u32,
    pub names: BTreeMap<String, String>,
    #[serde(skip)]
    pub local_name: String,
}

impl GameMap {
    /// Key naming this map in the localization tables
    pub fn strings_key(&self) -> String {
        format!("#maps:{}:{}", self.key, self.local_name)
    }
}

#[derive(Deserialize)]
struct Dictionary {
    #[serde(default)]
    maps: BTreeMap<String, DictionaryEntry>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct DictionaryEntry {
    id: u64,
    local_name: String,
    available_modes: Vec<u32>,
    supremacy_points_threshold: u32,
}

/// Map domain, keyed by the dictionary's internal key
#[derive(Default)]
pub struct Maps {
    table: Table<GameMap>,
    strings: StringsMatcher,
}

impl Maps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dictionary(&self) -> MapDictionary<'_> {
        MapDictionary { domain: self }
    }

    pub fn strings(&self) -> MapStrings<'_> {
        MapStrings { domain: self }
    }

    pub fn table(&self) -> &Table<GameMap> {
        &self.table
    }

    /// Records keyed by internal key
    pub fn records(&self) -> BTreeMap<String, GameMap> {
        self.table.snapshot()
    }
}

pub struct MapDictionary<'a> {
    domain: &'a Maps,
}

impl Extractor for MapDictionary<'_> {
    fn name(&self) -> &'static str {
        "map-dictionary"
    }

    fn matches(&self, path: &Path) -> bool {
        path.file_name().is_some_and(|name| name == DICTIONARY_FILE)
    }

    fn exclusive(&self) -> bool {
        true
    }

    fn parse(&self, path: &Path, content: &[u8]) -> Result<()> {
        let dictionary: Dictionary = serde_yaml::from_slice(content)?;
        debug!(path = %path.display(), count = dictionary.maps.len(), "Map dictionary");

        let mut table = self.domain.table.lock();
        for (key, entry) in dictionary.maps {
            let map = GameMap {
                id: entry.id.to_string(),
                key: key.clone(),
                available_modes: entry.available_modes,
                supremacy_points_threshold: entry.supremacy_points_threshold,
                names: BTreeMap::new(),
                local_name: entry.local_name,
            };
            table.insert(key, map);
        }
        Ok(())
    }
}

pub struct MapStrings<'a> {
    domain: &'a Maps,
}

impl Extractor for MapStrings<'_> {
    fn name(&self) -> &'static str {
        "map-strings"
    }

    fn matches(&self, path: &Path) -> bool {
        self.domain.strings.is_match(path)
    }

    fn exclusive(&self) -> bool {
        false
    }

    fn parse(&self, path: &Path, content: &[u8]) -> Result<()> {
        let strings = LocalizedStrings::parse(path, content)?;
        let locale = strings.locale.to_string();

        let mut table = self.domain.table.lock();
        for map in table.values_mut() {
            if let Some(name) = strings.get(&map.strings_key()) {
                map.names.insert(locale.clone(), name.to_string());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    const DICTIONARY: &str = "\
maps:
  foo:
    id: 5
    localName: x
    availableModes: [1, 2]
    supremacyPointsThreshold: 300
  bare:
    id: 7
";

    fn loaded() -> Maps {
        let maps = Maps::new();
        maps.dictionary()
            .parse(Path::new("/game/Data/maps.yaml"), DICTIONARY.as_bytes())
            .unwrap();
        maps
    }

    #[test]
    fn test_dictionary_matcher() {
        let maps = Maps::new();
        let dictionary = maps.dictionary();
        assert!(dictionary.matches(Path::new("/game/Data/maps.yaml")));
        assert!(dictionary.matches(Path::new("maps.yaml")));
        assert!(!dictionary.matches(Path::new("/game/Data/minimaps.yaml")));
        assert!(!dictionary.matches(Path::new("/game/Data/maps.yaml.dvpl")));
    }

    #[test]
    fn test_dictionary() {
        let records = loaded().records();
        assert_eq!(records.len(), 2);

        let foo = &records["foo"];
        assert_eq!(foo.id, "5");
        assert_eq!(foo.available_modes, vec![1, 2]);
        assert_eq!(foo.supremacy_points_threshold, 300);
        assert_eq!(foo.strings_key(), "#maps:foo:x");

        let bare = &records["bare"];
        assert_eq!(bare.id, "7");
        assert!(bare.available_modes.is_empty());
        assert_eq!(bare.strings_key(), "#maps:bare:");
    }

    #[test]
    fn test_dictionary_schema_error() {
        let maps = Maps::new();
        let err = maps
            .dictionary()
            .parse(Path::new("maps.yaml"), b"maps:\n  foo:\n    id: [not, a, number]\n")
            .unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
        assert!(maps.table().is_empty());
    }

    #[test]
    fn test_strings_attach_by_composite_key() {
        let maps = loaded();
        let strings = maps.strings();
        assert!(!strings.exclusive());

        strings
            .parse(
                Path::new("/game/Data/Strings/en.yaml"),
                b"\"#maps:foo:x\": Desert\n\"#maps:nowhere:y\": Nowhere\n",
            )
            .unwrap();

        let records = maps.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records["foo"].names["en"], "Desert");
        assert!(records["bare"].names.is_empty());
    }

    #[test]
    fn test_names_not_serialized_with_local_name() {
        let maps = loaded();
        let json = serde_json::to_value(&maps.records()["foo"]).unwrap();
        assert_eq!(json["availableModes"], serde_json::json!([1, 2]));
        assert_eq!(json["supremacyPointsThreshold"], 300);
        assert!(json.get("localName").is_none());
    }
}
