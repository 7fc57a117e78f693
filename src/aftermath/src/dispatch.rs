//! Concurrent directory walk feeding decoded files to extractors
//!
//! Every directory's entries are visited in parallel and the directory call
//! returns only after all of them finish. A file is read and decoded at most
//! once no matter how many extractors match it.
//!
//! Failure handling:
//! - an exclusive extractor failing on a file fails that file's directory
//!   (the branch), after its remaining entries have been visited
//! - a failed subdirectory is recorded, its parent carries on
//! - read and container errors, and non-exclusive extractor errors, are
//!   logged and counted as recovered

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use aftermath_dvpl::{is_container_path, strip_container_extension};
use rayon::prelude::*;
use tracing::{debug, error, info, warn};

use crate::extractor::Extractor;
use crate::{Error, Failure, Result};

/// Counters for one completed walk
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WalkSummary {
    /// Regular files seen
    pub files: usize,
    /// Files with at least one matching extractor
    pub matched: usize,
    /// Successful `parse` calls
    pub parsed: usize,
    /// Errors logged and skipped over
    pub recovered: usize,
}

#[derive(Default)]
struct WalkState {
    files: AtomicUsize,
    matched: AtomicUsize,
    parsed: AtomicUsize,
    recovered: AtomicUsize,
    failures: Mutex<Vec<Failure>>,
}

impl WalkState {
    fn fail(&self, failure: Failure) {
        self.failures.lock().unwrap().push(failure);
    }

    fn recover(&self) {
        self.recovered.fetch_add(1, Ordering::Relaxed);
    }

    fn summary(&self) -> WalkSummary {
        WalkSummary {
            files: self.files.load(Ordering::Relaxed),
            matched: self.matched.load(Ordering::Relaxed),
            parsed: self.parsed.load(Ordering::Relaxed),
            recovered: self.recovered.load(Ordering::Relaxed),
        }
    }
}

/// Walks a tree and routes files to a fixed extractor set
pub struct Dispatcher<'a> {
    extractors: Vec<&'a dyn Extractor>,
    decode_containers: bool,
    pass: &'static str,
}

impl<'a> Dispatcher<'a> {
    pub fn new(extractors: Vec<&'a dyn Extractor>) -> Self {
        Self {
            extractors,
            decode_containers: true,
            pass: "walk",
        }
    }

    /// Decode `*.dvpl` files before handing them out (default: on)
    ///
    /// When off, container files are offered under their real name and
    /// their bytes are passed through untouched.
    pub fn decode_containers(mut self, enabled: bool) -> Self {
        self.decode_containers = enabled;
        self
    }

    /// Label attached to this walk's log events
    pub fn pass(mut self, pass: &'static str) -> Self {
        self.pass = pass;
        self
    }

    /// Walk `root` to completion
    ///
    /// Returns [`Error::Aborted`] with every branch failure when any branch
    /// failed; all other branches still ran to the end.
    pub fn run(&self, root: impl AsRef<Path>) -> Result<WalkSummary> {
        if self.extractors.is_empty() {
            return Err(Error::NoExtractors);
        }

        let root = root.as_ref();
        let state = WalkState::default();

        if let Err(failure) = self.walk_dir(root, &state) {
            state.fail(failure);
        }

        let summary = state.summary();
        let mut failures = state.failures.into_inner().unwrap();

        info!(
            pass = self.pass,
            files = summary.files,
            matched = summary.matched,
            parsed = summary.parsed,
            recovered = summary.recovered,
            failed = failures.len(),
            "Walk finished"
        );

        if failures.is_empty() {
            Ok(summary)
        } else {
            failures.sort_by(|a, b| a.path.cmp(&b.path));
            Err(Error::Aborted(failures))
        }
    }

    fn walk_dir(&self, dir: &Path, state: &WalkState) -> std::result::Result<(), Failure> {
        let entries = fs::read_dir(dir).map_err(|e| {
            error!(pass = self.pass, path = %dir.display(), "Failed to read directory: {}", e);
            Failure::new(dir, None, Error::io(dir, e))
        })?;

        let mut children: Vec<PathBuf> = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => children.push(entry.path()),
                Err(e) => {
                    warn!(pass = self.pass, path = %dir.display(), "Skipping unreadable entry: {}", e);
                    state.recover();
                }
            }
        }
        children.sort();

        let mut fatal: Vec<Failure> = children
            .into_par_iter()
            .filter_map(|child| {
                if child.is_dir() {
                    if let Err(failure) = self.walk_dir(&child, state) {
                        state.fail(failure);
                    }
                    None
                } else {
                    self.visit_file(&child, state)
                }
            })
            .collect();

        if fatal.is_empty() {
            return Ok(());
        }

        let first = fatal.remove(0);
        for failure in fatal {
            state.fail(failure);
        }
        Err(first)
    }

    /// Offer one file to its matching extractors; `Some` when the branch must fail
    fn visit_file(&self, path: &Path, state: &WalkState) -> Option<Failure> {
        state.files.fetch_add(1, Ordering::Relaxed);

        let wrapped = self.decode_containers && is_container_path(path);
        let logical = if wrapped {
            strip_container_extension(path).unwrap_or_else(|| path.to_path_buf())
        } else {
            path.to_path_buf()
        };

        let matching: Vec<&dyn Extractor> = self
            .extractors
            .iter()
            .copied()
            .filter(|e| e.matches(&logical))
            .collect();
        if matching.is_empty() {
            return None;
        }
        state.matched.fetch_add(1, Ordering::Relaxed);

        let content = match self.load(path, wrapped) {
            Ok(content) => content,
            Err(e) => {
                warn!(pass = self.pass, path = %path.display(), "Skipping file: {}", e);
                state.recover();
                return None;
            }
        };

        let mut fatal = None;
        for extractor in matching {
            match extractor.parse(&logical, &content) {
                Ok(()) => {
                    debug!(pass = self.pass, extractor = extractor.name(), path = %logical.display(), "Parsed");
                    state.parsed.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) if extractor.exclusive() => {
                    error!(pass = self.pass, extractor = extractor.name(), path = %logical.display(), "{}", e);
                    let failure = Failure::new(&logical, Some(extractor.name()), e);
                    if fatal.is_none() {
                        fatal = Some(failure);
                    } else {
                        state.fail(failure);
                    }
                }
                Err(e) => {
                    warn!(pass = self.pass, extractor = extractor.name(), path = %logical.display(), "{}", e);
                    state.recover();
                }
            }
        }

        fatal
    }

    fn load(&self, path: &Path, wrapped: bool) -> Result<Vec<u8>> {
        let raw = fs::read(path).map_err(|e| Error::io(path, e))?;
        if wrapped {
            Ok(aftermath_dvpl::decode(&raw)?)
        } else {
            Ok(raw)
        }
    }
}
