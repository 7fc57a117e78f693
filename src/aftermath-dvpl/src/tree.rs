//! Decoding whole directory trees of wrapped files
//!
//! Mirrors an input tree into an output directory, writing the decoded
//! content of every `*.dvpl` file next to where its unwrapped name belongs.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::codec::decode;
use crate::{Error, Result, CONTAINER_EXTENSION};

/// Inner extensions worth decoding; everything else is skipped
pub const DECODED_EXTENSIONS: [&str; 3] = ["yaml", "xml", "txt"];

/// Check if a path carries the container extension
pub fn is_container_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case(CONTAINER_EXTENSION))
        .unwrap_or(false)
}

/// Drop the container extension: `maps.yaml.dvpl` -> `maps.yaml`
///
/// Returns `None` for paths that are not containers.
pub fn strip_container_extension(path: &Path) -> Option<PathBuf> {
    if is_container_path(path) {
        Some(path.with_extension(""))
    } else {
        None
    }
}

/// Outcome of a tree decode
#[derive(Debug, Default)]
pub struct TreeSummary {
    /// Output paths written
    pub decoded: Vec<PathBuf>,
    /// Files left alone (not containers, or an unlisted inner extension)
    pub skipped: usize,
    /// Files that could not be read, decoded or written
    pub failed: Vec<(PathBuf, Error)>,
}

fn has_decoded_extension(unwrapped: &Path) -> bool {
    unwrapped
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| DECODED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Decode every wrapped file under `input` into the mirrored path under `output`
///
/// Per-file failures are collected in the summary; only an unreadable input
/// root is an error.
pub fn decode_tree<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<TreeSummary> {
    let input = input.as_ref();
    let output = output.as_ref();

    // Surface a missing/unreadable root instead of an empty summary
    fs::read_dir(input)?;

    let mut summary = TreeSummary::default();
    let mut candidates = Vec::new();

    for entry in WalkDir::new(input) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(input).to_path_buf();
                summary.failed.push((path, Error::Io(e.into())));
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(input)
            .unwrap_or(entry.path())
            .to_path_buf();

        match strip_container_extension(&relative) {
            Some(unwrapped) if has_decoded_extension(&unwrapped) => {
                candidates.push((entry.path().to_path_buf(), output.join(unwrapped)));
            }
            _ => summary.skipped += 1,
        }
    }

    let results: Vec<(PathBuf, Result<PathBuf>)> = candidates
        .into_par_iter()
        .map(|(source, target)| {
            let result = decode_file(&source, &target).map(|()| target);
            (source, result)
        })
        .collect();

    for (source, result) in results {
        match result {
            Ok(target) => summary.decoded.push(target),
            Err(e) => summary.failed.push((source, e)),
        }
    }

    summary.decoded.sort();
    Ok(summary)
}

fn decode_file(source: &Path, target: &Path) -> Result<()> {
    let raw = fs::read(source)?;
    let decoded = decode(&raw)?;

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(target, decoded)?;
    Ok(())
}
