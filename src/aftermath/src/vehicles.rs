//! Vehicle records
//!
//! Identity comes from the per-nation item lists
//! (`XML/item_defs/vehicles/<nation>/list.xml`); each child element of the
//! root is one vehicle:
//!
//! ```xml
//! <root>
//!   <G12_Ltraktor>
//!     <id>12</id>
//!     <userString>#germany_vehicles:Ltraktor</userString>
//!     <shortUserString>#germany_vehicles:Ltraktor_short</shortUserString>
//!     <tags>germany lightTank collectible</tags>
//!     <level>3</level>
//!     <configurationModes>production supertest</configurationModes>
//!   </G12_Ltraktor>
//! </root>
//! ```
//!
//! Names come from the localization tables, looked up by the vehicle's key.

use std::collections::BTreeMap;
use std::path::Path;

use regex::Regex;
use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::extractor::{parent_dir_name, slash_path, Extractor};
use crate::nation::{global_id, nation_by_name};
use crate::reference::ReferenceCatalog;
use crate::strings::{LocalizedStrings, StringsMatcher};
use crate::table::Table;
use crate::{Error, Result};

/// Item lists anywhere below `XML/item_defs/vehicles/`
pub const ITEMS_PATTERN: &str = r"(?:^|/)XML/item_defs/vehicles/.*list\.xml$";

/// Lists sharing the item-list naming that hold no vehicles
const EXCLUDED_LISTS: [&str; 2] = ["provisions/list.xml", "consumables/list.xml"];

/// Vehicle classes, matched against the tag list
pub const VEHICLE_CLASSES: [&str; 4] = ["AT-SPG", "lightTank", "mediumTank", "heavyTank"];

pub const UNKNOWN_CLASS: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: String,
    pub key: String,
    pub names: BTreeMap<String, String>,
    pub tier: u32,
    pub class: String,
    pub nation: String,
    pub premium: bool,
    pub super_test: bool,
    pub collectible: bool,
}

/// Raw fields of one item element
#[derive(Debug, Default)]
struct VehicleItem<'a> {
    local_id: u32,
    user_string: &'a str,
    short_user_string: &'a str,
    tags: Vec<&'a str>,
    level: u32,
    environments: Vec<&'a str>,
}

impl VehicleItem<'_> {
    fn key(&self) -> &str {
        if self.short_user_string.is_empty() {
            self.user_string
        } else {
            self.short_user_string
        }
    }

    fn class(&self) -> &str {
        self.tags
            .iter()
            .copied()
            .find(|tag| VEHICLE_CLASSES.iter().any(|class| class == tag))
            .unwrap_or(UNKNOWN_CLASS)
    }

    fn super_test(&self) -> bool {
        self.environments.contains(&"supertest") && !self.environments.contains(&"production")
    }

    fn collectible(&self) -> bool {
        self.tags.contains(&"collectible")
    }

    /// Build the record, filling locally empty fields from the catalog
    fn into_vehicle(self, nation: &str, catalog: &ReferenceCatalog) -> Vehicle {
        let id = global_id(nation, self.local_id).to_string();
        let reference = catalog.get(&id);

        let tier = match (self.level, reference) {
            (0, Some(r)) => r.tier,
            (level, _) => level,
        };
        let class = match (self.class(), reference) {
            (UNKNOWN_CLASS, Some(r)) if !r.class.is_empty() => r.class.clone(),
            (class, _) => class.to_string(),
        };

        Vehicle {
            key: self.key().to_string(),
            names: reference.map(|r| r.names.clone()).unwrap_or_default(),
            tier,
            class,
            nation: nation.to_string(),
            premium: reference.is_some_and(|r| r.premium),
            super_test: self.super_test(),
            collectible: self.collectible(),
            id,
        }
    }
}

fn child_text<'a>(node: Node<'a, '_>, name: &str) -> &'a str {
    node.children()
        .find(|c| c.has_tag_name(name))
        .and_then(|c| c.text())
        .map(str::trim)
        .unwrap_or_default()
}

/// Parse every item of one list, skipping items without an id
fn parse_items<'a>(path: &Path, doc: &'a Document<'_>) -> Result<Vec<VehicleItem<'a>>> {
    let mut items = Vec::new();

    for node in doc.root_element().children().filter(|n| n.is_element()) {
        let name = node.tag_name().name();
        let id = child_text(node, "id");
        if id.is_empty() {
            debug!(path = %path.display(), item = name, "Skipping item without id");
            continue;
        }

        let local_id = id
            .parse()
            .map_err(|_| Error::schema(path, format!("item {name}: invalid id '{id}'")))?;
        let level = match child_text(node, "level") {
            "" => 0,
            level => level
                .parse()
                .map_err(|_| Error::schema(path, format!("item {name}: invalid level '{level}'")))?,
        };

        items.push(VehicleItem {
            local_id,
            user_string: child_text(node, "userString"),
            short_user_string: child_text(node, "shortUserString"),
            tags: child_text(node, "tags").split_whitespace().collect(),
            level,
            environments: child_text(node, "configurationModes")
                .split_whitespace()
                .collect(),
        });
    }

    Ok(items)
}

/// Vehicle domain: owns the record table shared by its two passes
pub struct Vehicles {
    catalog: ReferenceCatalog,
    table: Table<Vehicle>,
    items_pattern: Regex,
    strings: StringsMatcher,
}

impl Vehicles {
    pub fn new(catalog: ReferenceCatalog) -> Self {
        Self {
            catalog,
            table: Table::new(),
            items_pattern: Regex::new(ITEMS_PATTERN).unwrap(),
            strings: StringsMatcher::default(),
        }
    }

    /// Identity pass view
    pub fn items(&self) -> VehicleItems<'_> {
        VehicleItems { domain: self }
    }

    /// Strings pass view
    pub fn strings(&self) -> VehicleStrings<'_> {
        VehicleStrings { domain: self }
    }

    pub fn table(&self) -> &Table<Vehicle> {
        &self.table
    }

    /// Records keyed by id
    pub fn records(&self) -> BTreeMap<String, Vehicle> {
        self.table.snapshot()
    }
}

pub struct VehicleItems<'a> {
    domain: &'a Vehicles,
}

impl Extractor for VehicleItems<'_> {
    fn name(&self) -> &'static str {
        "vehicle-items"
    }

    fn matches(&self, path: &Path) -> bool {
        let path = slash_path(path);
        self.domain.items_pattern.is_match(&path)
            && !EXCLUDED_LISTS.iter().any(|list| path.ends_with(list))
    }

    fn exclusive(&self) -> bool {
        true
    }

    fn parse(&self, path: &Path, content: &[u8]) -> Result<()> {
        let text = std::str::from_utf8(content)
            .map_err(|e| Error::schema(path, format!("not UTF-8: {e}")))?;
        let doc = Document::parse(text.trim_start_matches('\u{feff}'))?;
        let items = parse_items(path, &doc)?;

        let nation = parent_dir_name(path).unwrap_or_default();
        if nation_by_name(&nation).is_none() {
            return Err(Error::UnrecognizedNation(nation));
        }

        let vehicles: Vec<Vehicle> = items
            .into_iter()
            .map(|item| item.into_vehicle(&nation, &self.domain.catalog))
            .collect();
        debug!(path = %path.display(), nation = %nation, count = vehicles.len(), "Vehicle items");

        let mut table = self.domain.table.lock();
        for vehicle in vehicles {
            table.insert(vehicle.id.clone(), vehicle);
        }
        Ok(())
    }
}

pub struct VehicleStrings<'a> {
    domain: &'a Vehicles,
}

impl Extractor for VehicleStrings<'_> {
    fn name(&self) -> &'static str {
        "vehicle-strings"
    }

    fn matches(&self, path: &Path) -> bool {
        self.domain.strings.is_match(path)
    }

    fn exclusive(&self) -> bool {
        true
    }

    fn parse(&self, path: &Path, content: &[u8]) -> Result<()> {
        let strings = LocalizedStrings::parse(path, content)?;
        let locale = strings.locale.to_string();

        let mut table = self.domain.table.lock();
        for vehicle in table.values_mut() {
            if let Some(name) = strings.get(&vehicle.key) {
                vehicle.names.insert(locale.clone(), name.to_string());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferenceEntry;

    const GERMANY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<root>
  <G12_Ltraktor>
    <id>12</id>
    <userString>#germany_vehicles:Ltraktor</userString>
    <shortUserString>#germany_vehicles:Ltraktor_short</shortUserString>
    <tags>germany lightTank collectible</tags>
    <level>3</level>
    <configurationModes>supertest</configurationModes>
  </G12_Ltraktor>
  <G99_Prototype>
    <id>99</id>
    <userString>#germany_vehicles:Prototype</userString>
    <tags>germany secret</tags>
    <configurationModes>production supertest</configurationModes>
  </G99_Prototype>
  <G00_Template>
    <userString>#germany_vehicles:Template</userString>
  </G00_Template>
</root>"#;

    const GERMANY_PATH: &str = "/game/Data/XML/item_defs/vehicles/germany/list.xml";

    fn parse_germany(vehicles: &Vehicles) {
        vehicles
            .items()
            .parse(Path::new(GERMANY_PATH), GERMANY.as_bytes())
            .unwrap();
    }

    #[test]
    fn test_items_matcher() {
        let vehicles = Vehicles::new(ReferenceCatalog::new());
        let items = vehicles.items();
        assert!(items.matches(Path::new(GERMANY_PATH)));
        assert!(items.matches(Path::new("XML/item_defs/vehicles/ussr/list.xml")));
        assert!(!items.matches(Path::new("/game/Data/XML/item_defs/vehicles/common/provisions/list.xml")));
        assert!(!items.matches(Path::new("/game/Data/XML/item_defs/vehicles/common/consumables/list.xml")));
        assert!(!items.matches(Path::new("/game/Data/XML/item_defs/maps/list.xml")));
        assert!(!items.matches(Path::new("/game/Data/XML/item_defs/vehicles/germany/list.xml.dvpl")));
    }

    #[test]
    fn test_parse_items() {
        let vehicles = Vehicles::new(ReferenceCatalog::new());
        parse_germany(&vehicles);

        let records = vehicles.records();
        assert_eq!(records.len(), 2);

        let light = &records["3089"];
        assert_eq!(light.key, "#germany_vehicles:Ltraktor_short");
        assert_eq!(light.tier, 3);
        assert_eq!(light.class, "lightTank");
        assert_eq!(light.nation, "germany");
        assert!(light.super_test);
        assert!(light.collectible);
        assert!(!light.premium);
        assert!(light.names.is_empty());

        let proto = &records[&global_id("germany", 99).to_string()];
        assert_eq!(proto.key, "#germany_vehicles:Prototype");
        assert_eq!(proto.tier, 0);
        assert_eq!(proto.class, UNKNOWN_CLASS);
        assert!(!proto.super_test);
        assert!(!proto.collectible);
    }

    #[test]
    fn test_catalog_fills_empty_fields() {
        let proto_id = global_id("germany", 99).to_string();
        let mut catalog = ReferenceCatalog::new();
        catalog.insert(
            proto_id.clone(),
            ReferenceEntry {
                tier: 8,
                class: "heavyTank".to_string(),
                premium: true,
                names: BTreeMap::from([("en".to_string(), "Prototype".to_string())]),
            },
        );
        catalog.insert(
            "3089",
            ReferenceEntry {
                tier: 10,
                class: "heavyTank".to_string(),
                premium: false,
                names: BTreeMap::new(),
            },
        );

        let vehicles = Vehicles::new(catalog);
        parse_germany(&vehicles);
        let records = vehicles.records();

        let proto = &records[&proto_id];
        assert_eq!(proto.tier, 8);
        assert_eq!(proto.class, "heavyTank");
        assert!(proto.premium);
        assert_eq!(proto.names["en"], "Prototype");

        // Local values win when present
        let light = &records["3089"];
        assert_eq!(light.tier, 3);
        assert_eq!(light.class, "lightTank");
    }

    #[test]
    fn test_identity_pass_is_idempotent() {
        let vehicles = Vehicles::new(ReferenceCatalog::new());
        parse_germany(&vehicles);
        let once = vehicles.records();
        parse_germany(&vehicles);
        assert_eq!(vehicles.records(), once);
    }

    #[test]
    fn test_item_errors() {
        let vehicles = Vehicles::new(ReferenceCatalog::new());
        let items = vehicles.items();

        let bad_id = "<root><A><id>twelve</id></A></root>";
        assert!(matches!(
            items.parse(Path::new(GERMANY_PATH), bad_id.as_bytes()),
            Err(Error::Schema { .. })
        ));

        let bad_level = "<root><A><id>1</id><level>III</level></A></root>";
        assert!(matches!(
            items.parse(Path::new(GERMANY_PATH), bad_level.as_bytes()),
            Err(Error::Schema { .. })
        ));

        assert!(matches!(
            items.parse(Path::new(GERMANY_PATH), b"<root><unclosed></root>"),
            Err(Error::Xml(_))
        ));

        let atlantis = "/game/Data/XML/item_defs/vehicles/atlantis/list.xml";
        assert!(matches!(
            items.parse(Path::new(atlantis), GERMANY.as_bytes()),
            Err(Error::UnrecognizedNation(n)) if n == "atlantis"
        ));

        // Nothing was written by the failed calls
        assert!(vehicles.table().is_empty());
    }

    #[test]
    fn test_european_is_recognized() {
        let vehicles = Vehicles::new(ReferenceCatalog::new());
        let path = "/game/Data/XML/item_defs/vehicles/european/list.xml";
        vehicles
            .items()
            .parse(Path::new(path), b"<root><E1><id>1</id><level>5</level></E1></root>")
            .unwrap();
        assert!(vehicles.table().get(&global_id("european", 1).to_string()).is_some());
    }

    #[test]
    fn test_strings_attach_names() {
        let vehicles = Vehicles::new(ReferenceCatalog::new());
        parse_germany(&vehicles);

        let strings = vehicles.strings();
        assert!(strings.matches(Path::new("/game/Data/Strings/en.yaml")));
        strings
            .parse(
                Path::new("/game/Data/Strings/en.yaml"),
                b"\"#germany_vehicles:Ltraktor_short\": Panther\n\"#germany_vehicles:Unknown\": Ghost\n",
            )
            .unwrap();
        strings
            .parse(
                Path::new("/game/Data/Strings/zh-cn.yaml"),
                "\"#germany_vehicles:Ltraktor_short\": 黑豹\n".as_bytes(),
            )
            .unwrap();

        let records = vehicles.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records["3089"].names["en"], "Panther");
        assert_eq!(records["3089"].names["zh-CN"], "黑豹");
        assert!(records[&global_id("germany", 99).to_string()].names.is_empty());
    }

    #[test]
    fn test_strings_never_create_records() {
        let vehicles = Vehicles::new(ReferenceCatalog::new());
        vehicles
            .strings()
            .parse(Path::new("Strings/en.yaml"), b"\"#ussr_vehicles:T-34\": T-34\n")
            .unwrap();
        assert!(vehicles.table().is_empty());
    }
}
