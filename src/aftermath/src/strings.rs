//! Per-locale localization tables (`Strings/<locale>.yaml`)

use std::collections::BTreeMap;
use std::path::Path;

use regex::Regex;
use serde_yaml::Value;
use tracing::debug;

use crate::extractor::slash_path;
use crate::{Error, Locale, Result};

/// Any `.yaml` file below a `Strings/` directory
pub const STRINGS_PATTERN: &str = r"(?:^|/)Strings/.+\.yaml$";

/// Matcher for localization files, shared by every strings extractor
#[derive(Debug, Clone)]
pub struct StringsMatcher {
    pattern: Regex,
}

impl Default for StringsMatcher {
    fn default() -> Self {
        Self {
            pattern: Regex::new(STRINGS_PATTERN).unwrap(),
        }
    }
}

impl StringsMatcher {
    pub fn is_match(&self, path: &Path) -> bool {
        self.pattern.is_match(&slash_path(path))
    }
}

/// One decoded localization file
#[derive(Debug, Clone)]
pub struct LocalizedStrings {
    pub locale: Locale,
    pub entries: BTreeMap<String, String>,
}

impl LocalizedStrings {
    /// Parse a localization file; the locale comes from the file name
    pub fn parse(path: &Path, content: &[u8]) -> Result<Self> {
        let locale = Locale::from_path(path)?;
        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self {
                locale,
                entries: BTreeMap::new(),
            });
        }

        let mapping = match serde_yaml::from_slice::<Value>(content)? {
            Value::Null => Default::default(),
            Value::Mapping(mapping) => mapping,
            _ => return Err(Error::schema(path, "expected a key/value mapping")),
        };

        let mut entries = BTreeMap::new();
        for (key, value) in mapping {
            match (scalar(&key), scalar(&value)) {
                (Some(key), Some(value)) => {
                    entries.insert(key, value);
                }
                _ => debug!(path = %path.display(), "Skipping non-scalar entry"),
            }
        }

        Ok(Self { locale, entries })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
