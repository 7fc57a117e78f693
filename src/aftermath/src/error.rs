//! Error types shared by the dispatcher and the domain extractors

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Container error: {0}")]
    Container(#[from] aftermath_dvpl::Error),

    #[error("Schema error in {}: {message}", path.display())]
    Schema { path: PathBuf, message: String },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unrecognized nation directory: {0}")]
    UnrecognizedNation(String),

    #[error("Invalid locale tag '{0}'")]
    LocaleTag(String),

    #[error("No extractors registered")]
    NoExtractors,

    #[error("Walk aborted in {} branch(es): {}", .0.len(), summarize(.0))]
    Aborted(Vec<Failure>),
}

impl Error {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn schema(path: &Path, message: impl Into<String>) -> Self {
        Error::Schema {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// A failed file or directory, with the extractor that reported it
#[derive(Debug)]
pub struct Failure {
    pub path: PathBuf,
    /// `None` for failures outside any extractor (unreadable directory, bad container)
    pub extractor: Option<&'static str>,
    pub error: Error,
}

impl Failure {
    pub fn new(path: impl Into<PathBuf>, extractor: Option<&'static str>, error: Error) -> Self {
        Self {
            path: path.into(),
            extractor,
            error,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.extractor {
            Some(name) => write!(f, "{} [{}]: {}", self.path.display(), name, self.error),
            None => write!(f, "{}: {}", self.path.display(), self.error),
        }
    }
}

fn summarize(failures: &[Failure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
