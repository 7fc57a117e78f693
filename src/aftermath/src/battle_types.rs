//! Battle type names harvested from `battleType/<name>` localization keys

use std::collections::BTreeMap;
use std::path::Path;

use crate::extractor::Extractor;
use crate::strings::{LocalizedStrings, StringsMatcher};
use crate::table::Table;
use crate::Result;

const KEY_PREFIX: &str = "battleType/";

/// Prefix of the exported battle type keys
pub const EXPORT_PREFIX: &str = "game_mode_";

/// Locale to name, per lower-cased battle type
#[derive(Default)]
pub struct BattleTypes {
    table: Table<BTreeMap<String, String>>,
    strings: StringsMatcher,
}

impl BattleTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self) -> &Table<BTreeMap<String, String>> {
        &self.table
    }

    /// Names keyed by battle type (without the export prefix)
    pub fn records(&self) -> BTreeMap<String, BTreeMap<String, String>> {
        self.table.snapshot()
    }
}

/// `battleType/Regular` -> `regular`; nested keys are not battle types
fn battle_type(key: &str) -> Option<String> {
    let name = key.strip_prefix(KEY_PREFIX)?;
    if name.contains('/') {
        return None;
    }
    Some(name.to_lowercase())
}

impl Extractor for BattleTypes {
    fn name(&self) -> &'static str {
        "battle-types"
    }

    fn matches(&self, path: &Path) -> bool {
        self.strings.is_match(path)
    }

    fn exclusive(&self) -> bool {
        false
    }

    fn parse(&self, path: &Path, content: &[u8]) -> Result<()> {
        let strings = LocalizedStrings::parse(path, content)?;
        let locale = strings.locale.to_string();

        let mut table = self.table.lock();
        for (key, value) in &strings.entries {
            if let Some(name) = battle_type(key) {
                table
                    .entry(name)
                    .or_default()
                    .insert(locale.clone(), value.clone());
            }
        }
        Ok(())
    }
}
