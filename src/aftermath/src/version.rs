//! Client build metadata (`version.txt`)
//!
//! A single line of three tokens:
//!
//! ```text
//! 11.1.0.743_4002766 release/11.1.0 WOTB_Win7
//! ```

use std::path::Path;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::extractor::Extractor;
use crate::{Error, Result};

pub const VERSION_FILE: &str = "version.txt";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRecord {
    pub tag: String,
    pub game_version: String,
    pub arch: String,
}

impl VersionRecord {
    pub fn parse(path: &Path, content: &[u8]) -> Result<Self> {
        let text = String::from_utf8_lossy(content);
        let tokens: Vec<&str> = text.split_whitespace().collect();

        let [tag, release, arch] = tokens[..] else {
            return Err(Error::schema(
                path,
                format!("expected 3 tokens, got {}", tokens.len()),
            ));
        };

        Ok(Self {
            tag: tag.to_string(),
            game_version: release.strip_prefix("release/").unwrap_or(release).to_string(),
            arch: arch.strip_prefix("WOTB_").unwrap_or(arch).to_lowercase(),
        })
    }
}

#[derive(Default)]
pub struct Version {
    record: Mutex<Option<VersionRecord>>,
}

impl Version {
    pub fn new() -> Self {
        Self::default()
    }

    /// The parsed record, if the version file was seen
    pub fn record(&self) -> Option<VersionRecord> {
        self.record.lock().unwrap().clone()
    }
}

impl Extractor for Version {
    fn name(&self) -> &'static str {
        "version"
    }

    fn matches(&self, path: &Path) -> bool {
        path.file_name().is_some_and(|name| name == VERSION_FILE)
    }

    fn exclusive(&self) -> bool {
        true
    }

    fn parse(&self, path: &Path, content: &[u8]) -> Result<()> {
        let record = VersionRecord::parse(path, content)?;
        *self.record.lock().unwrap() = Some(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let version = Version::new();
        assert!(version.record().is_none());
        version
            .parse(
                Path::new("/game/Data/version.txt"),
                b"11.1.0.743_4002766 release/11.1.0 WOTB_Win7\n",
            )
            .unwrap();

        assert_eq!(
            version.record(),
            Some(VersionRecord {
                tag: "11.1.0.743_4002766".to_string(),
                game_version: "11.1.0".to_string(),
                arch: "win7".to_string(),
            })
        );
    }

    #[test]
    fn test_wrong_token_count() {
        for content in ["", "one two", "a release/b WOTB_c extra"] {
            let err = VersionRecord::parse(Path::new("version.txt"), content.as_bytes()).unwrap_err();
            assert!(matches!(err, Error::Schema { .. }), "{content:?}");
        }
    }

    #[test]
    fn test_matches_exact_name() {
        let version = Version::new();
        assert!(version.matches(Path::new("/game/Data/version.txt")));
        assert!(!version.matches(Path::new("/game/Data/client_version.txt")));
    }

    #[test]
    fn test_serialized_fields() {
        let record = VersionRecord::parse(Path::new("version.txt"), b"a release/b WOTB_Android").unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, serde_json::json!({"tag": "a", "gameVersion": "b", "arch": "android"}));
    }
}
