//! Locale tags derived from localization file names

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use unic_langid::LanguageIdentifier;

use crate::{Error, Result};

/// A language/region tag such as `en` or `zh-CN`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale(LanguageIdentifier);

impl Locale {
    /// Locale named by a file's base name up to the first dot
    ///
    /// `Data/Strings/zh-cn.yaml` -> `zh-CN`
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .ok_or_else(|| Error::LocaleTag(path.display().to_string()))?;
        let stem = name.split('.').next().unwrap_or_default();
        stem.parse()
    }

    pub fn english() -> Self {
        Self(unic_langid::langid!("en"))
    }

    pub fn as_langid(&self) -> &LanguageIdentifier {
        &self.0
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::english()
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::LocaleTag(s.to_string()));
        }
        s.parse::<LanguageIdentifier>()
            .map(Self)
            .map_err(|_| Error::LocaleTag(s.to_string()))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
