//! The contract between the dispatcher and the domain extractors

use std::path::Path;

use crate::Result;

/// A consumer of decoded game files
///
/// Implementations own (or borrow) a domain table and mutate it from `parse`.
/// The dispatcher calls `parse` concurrently for different files, so the
/// table must stay consistent even when a call fails partway.
pub trait Extractor: Send + Sync {
    /// Short name used in logs and failure reports
    fn name(&self) -> &'static str;

    /// Whether this extractor wants the file at `path`
    ///
    /// `path` is the logical path: container suffix already removed.
    fn matches(&self, path: &Path) -> bool;

    /// A failed `parse` aborts the enclosing directory's walk when true
    fn exclusive(&self) -> bool;

    fn parse(&self, path: &Path, content: &[u8]) -> Result<()>;
}

/// Path in `/`-separated form for pattern matching
pub fn slash_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Name of the directory holding `path`
pub(crate) fn parent_dir_name(path: &Path) -> Option<String> {
    path.parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slash_path() {
        assert_eq!(
            slash_path(Path::new("Data/XML/item_defs/vehicles/ussr/list.xml")),
            "Data/XML/item_defs/vehicles/ussr/list.xml"
        );
        assert_eq!(slash_path(Path::new(r"Data\Strings\en.yaml")), "Data/Strings/en.yaml");
    }

    #[test]
    fn test_parent_dir_name() {
        assert_eq!(
            parent_dir_name(Path::new("XML/item_defs/vehicles/germany/list.xml")).as_deref(),
            Some("germany")
        );
        assert_eq!(parent_dir_name(Path::new("list.xml")), None);
    }
}
