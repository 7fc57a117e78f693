//! Two-pass extraction over a game data tree, then export
//!
//! The identity pass reads the definition files (vehicle item lists, map
//! dictionary, version). The strings pass then attaches localized names to
//! the records the identity pass created. Both passes always run; their
//! branch failures are reported together.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::battle_types::BattleTypes;
use crate::dispatch::Dispatcher;
use crate::export::{self, ExportSummary};
use crate::extractor::Extractor;
use crate::maps::Maps;
use crate::reference::ReferenceCatalog;
use crate::vehicles::Vehicles;
use crate::version::Version;
use crate::{Error, Locale, Result};

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Locale other locales are reduced against on export
    pub reference_locale: Locale,
    /// Decode `*.dvpl` containers while walking
    pub decode_containers: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            reference_locale: Locale::english(),
            decode_containers: true,
        }
    }
}

pub struct Pipeline {
    options: PipelineOptions,
    vehicles: Vehicles,
    maps: Maps,
    battle_types: BattleTypes,
    version: Version,
}

impl Pipeline {
    pub fn new(catalog: ReferenceCatalog, options: PipelineOptions) -> Self {
        Self {
            options,
            vehicles: Vehicles::new(catalog),
            maps: Maps::new(),
            battle_types: BattleTypes::new(),
            version: Version::new(),
        }
    }

    /// Run both passes over `root`
    ///
    /// Fails with [`Error::Aborted`] listing the failures of both passes;
    /// whatever the passes did extract stays available for export.
    pub fn run(&self, root: &Path) -> Result<()> {
        let items = self.vehicles.items();
        let dictionary = self.maps.dictionary();
        let identity: Vec<&dyn Extractor> = vec![&items as &dyn Extractor, &dictionary, &self.version];

        let vehicle_strings = self.vehicles.strings();
        let map_strings = self.maps.strings();
        let strings: Vec<&dyn Extractor> = vec![
            &vehicle_strings as &dyn Extractor,
            &map_strings,
            &self.battle_types,
        ];

        let mut failures = Vec::new();
        for (pass, extractors) in [("identity", identity), ("strings", strings)] {
            let dispatcher = Dispatcher::new(extractors)
                .decode_containers(self.options.decode_containers)
                .pass(pass);

            match dispatcher.run(root) {
                Ok(_) => {}
                Err(Error::Aborted(mut pass_failures)) => {
                    warn!(pass, failed = pass_failures.len(), "Pass finished with failures");
                    failures.append(&mut pass_failures);
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            vehicles = self.vehicles.table().len(),
            maps = self.maps.table().len(),
            battle_types = self.battle_types.table().len(),
            "Extraction finished"
        );

        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::Aborted(failures))
        }
    }

    /// Write every document into `output`
    pub fn export(&self, output: &Path) -> Result<ExportSummary> {
        let reference = self.options.reference_locale.to_string();
        let vehicles = self.vehicles.records();
        let maps = self.maps.records();
        let battle_types = self.battle_types.records();

        let mut summary = ExportSummary {
            vehicles: vehicles.len(),
            maps: maps.len(),
            battle_types: battle_types.len(),
            ..Default::default()
        };

        let files = &mut summary.files;
        write_document(
            files,
            &output.join(export::VEHICLES_FILE),
            &export::vehicles_document(&vehicles, &reference),
        )?;
        write_document(
            files,
            &output.join(export::MAPS_FILE),
            &export::maps_document(&maps, &reference),
        )?;
        write_document(
            files,
            &output.join(export::BATTLE_TYPES_FILE),
            &export::battle_types_document(&battle_types, &reference),
        )?;
        match self.version.record() {
            Some(record) => write_document(files, &output.join(export::VERSION_FILE), &record)?,
            None => warn!("No version file found, skipping {}", export::VERSION_FILE),
        }

        let catalogs = export::locale_catalogs(&vehicles, &maps, &battle_types);
        for (locale, strings) in &catalogs {
            let path = output.join(locale).join(export::LOCALE_STRINGS_FILE);
            write_document(files, &path, strings)?;
        }
        summary.locales = catalogs.len();

        info!(
            output = %output.display(),
            files = summary.files.len(),
            locales = summary.locales,
            "Export finished"
        );
        Ok(summary)
    }

    pub fn vehicles(&self) -> &Vehicles {
        &self.vehicles
    }

    pub fn maps(&self) -> &Maps {
        &self.maps
    }

    pub fn battle_types(&self) -> &BattleTypes {
        &self.battle_types
    }

    pub fn version(&self) -> &Version {
        &self.version
    }
}

fn write_document<T: Serialize>(files: &mut Vec<PathBuf>, path: &Path, value: &T) -> Result<()> {
    export::write_json(path, value)?;
    files.push(path.to_path_buf());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::LocaleStrings;
    use crate::maps::GameMap;
    use crate::nation::global_id;
    use crate::vehicles::Vehicle;
    use aftermath_dvpl::{encode, Compression};
    use std::collections::BTreeMap;
    use std::fs;

    const GERMANY: &str = "<root><G12_Ltraktor>\
        <id>12</id>\
        <userString>#germany_vehicles:Ltraktor</userString>\
        <tags>germany lightTank</tags>\
        <level>3</level>\
        </G12_Ltraktor></root>";

    const USSR: &str = "<root><R11_MS-1><id>1</id>\
        <userString>#ussr_vehicles:MS-1</userString>\
        <tags>ussr lightTank</tags><level>1</level></R11_MS-1></root>";

    const MAPS: &str = "maps:\n  foo:\n    id: 5\n    localName: x\n    availableModes: [1, 2]\n    supremacyPointsThreshold: 300\n";

    fn write(root: &Path, relative: &str, data: &[u8]) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, data).unwrap();
    }

    fn wrapped(root: &Path, relative: &str, data: &str) {
        write(root, &format!("{relative}.dvpl"), &encode(data.as_bytes(), Compression::Lz4));
    }

    fn read<T: serde::de::DeserializeOwned>(path: &Path) -> T {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    fn game_tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        wrapped(root, "Data/XML/item_defs/vehicles/germany/list.xml", GERMANY);
        wrapped(root, "Data/maps.yaml", MAPS);
        wrapped(root, "Data/version.txt", "11.1.0.743_4002766 release/11.1.0 WOTB_Win7");
        wrapped(
            root,
            "Data/Strings/en.yaml",
            "\"#germany_vehicles:Ltraktor\": Panther\n\"#maps:foo:x\": Desert\nbattleType/Regular: Regular Battle\n",
        );
        wrapped(
            root,
            "Data/Strings/de.yaml",
            "\"#germany_vehicles:Ltraktor\": Panther\n\"#maps:foo:x\": Wüste\n\"#ghost_vehicles:Nope\": Ghost\n",
        );
        // Not offered to anyone
        write(root, "Data/Gfx/tank.png", b"png");
        dir
    }

    #[test]
    fn test_end_to_end() {
        let input = game_tree();
        let output = tempfile::tempdir().unwrap();

        let pipeline = Pipeline::new(ReferenceCatalog::new(), PipelineOptions::default());
        pipeline.run(input.path()).unwrap();
        let summary = pipeline.export(output.path()).unwrap();

        assert_eq!(summary.vehicles, 1);
        assert_eq!(summary.maps, 1);
        assert_eq!(summary.battle_types, 1);
        assert_eq!(summary.locales, 2);
        assert_eq!(summary.files.len(), 6);

        let vehicles: BTreeMap<String, Vehicle> = read(&output.path().join("vehicles.json"));
        assert_eq!(vehicles.len(), 1);
        let vehicle = &vehicles[&global_id("germany", 12).to_string()];
        assert_eq!(vehicle.class, "lightTank");
        assert_eq!(vehicle.tier, 3);
        // German equals English and is reduced away
        assert_eq!(vehicle.names, BTreeMap::from([("en".to_string(), "Panther".to_string())]));

        let maps: BTreeMap<String, GameMap> = read(&output.path().join("maps.json"));
        let map = &maps["5"];
        assert_eq!(map.id, "5");
        assert_eq!(map.available_modes, vec![1, 2]);
        assert_eq!(map.supremacy_points_threshold, 300);
        assert_eq!(map.names["de"], "Wüste");

        let battle_types: BTreeMap<String, BTreeMap<String, String>> =
            read(&output.path().join("battle_types.json"));
        assert_eq!(battle_types["game_mode_regular"]["en"], "Regular Battle");

        let version: serde_json::Value = read(&output.path().join("version.json"));
        assert_eq!(version["gameVersion"], "11.1.0");
        assert_eq!(version["arch"], "win7");

        let german: LocaleStrings = read(&output.path().join("de/strings.json"));
        assert_eq!(german.vehicles["3089"], "Panther");
        assert_eq!(german.maps["5"], "Wüste");
    }

    #[test]
    fn test_malformed_items_abort_only_their_branch() {
        let input = game_tree();
        let root = input.path();
        wrapped(root, "Data/XML/item_defs/vehicles/germany/list.xml", "<root><broken></root>");
        wrapped(root, "Data/XML/item_defs/vehicles/ussr/list.xml", USSR);

        let pipeline = Pipeline::new(ReferenceCatalog::new(), PipelineOptions::default());
        match pipeline.run(root) {
            Err(Error::Aborted(failures)) => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].extractor, Some("vehicle-items"));
                assert!(failures[0].path.ends_with("germany/list.xml"));
            }
            other => panic!("expected Aborted, got {other:?}"),
        }

        // Sibling nation and the other domains still export
        let output = tempfile::tempdir().unwrap();
        pipeline.export(output.path()).unwrap();
        let vehicles: BTreeMap<String, Vehicle> = read(&output.path().join("vehicles.json"));
        assert_eq!(vehicles.len(), 1);
        assert!(vehicles.contains_key(&global_id("ussr", 1).to_string()));
        assert_eq!(pipeline.maps().table().len(), 1);
        assert!(pipeline.version().record().is_some());
    }

    #[test]
    fn test_unrecognized_nation_is_fatal() {
        let input = game_tree();
        wrapped(input.path(), "Data/XML/item_defs/vehicles/atlantis/list.xml", USSR);

        let pipeline = Pipeline::new(ReferenceCatalog::new(), PipelineOptions::default());
        match pipeline.run(input.path()) {
            Err(Error::Aborted(failures)) => {
                assert!(matches!(failures[0].error, Error::UnrecognizedNation(ref n) if n == "atlantis"));
            }
            other => panic!("expected Aborted, got {other:?}"),
        }
        assert_eq!(pipeline.vehicles().table().len(), 1);
    }

    #[test]
    fn test_reference_locale_option() {
        let input = game_tree();
        let output = tempfile::tempdir().unwrap();
        let options = PipelineOptions {
            reference_locale: "de".parse().unwrap(),
            ..Default::default()
        };

        let pipeline = Pipeline::new(ReferenceCatalog::new(), options);
        pipeline.run(input.path()).unwrap();
        pipeline.export(output.path()).unwrap();

        let vehicles: BTreeMap<String, Vehicle> = read(&output.path().join("vehicles.json"));
        let names = &vehicles["3089"].names;
        assert_eq!(names.keys().collect::<Vec<_>>(), vec!["de"]);
    }

    #[test]
    fn test_plain_tree_without_decoding() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Data/version.txt", b"a release/b WOTB_c");
        write(dir.path(), "Data/version.txt.dvpl", b"never decoded");

        let options = PipelineOptions {
            decode_containers: false,
            ..Default::default()
        };
        let pipeline = Pipeline::new(ReferenceCatalog::new(), options);
        pipeline.run(dir.path()).unwrap();
        assert_eq!(pipeline.version().record().unwrap().tag, "a");
    }
}
