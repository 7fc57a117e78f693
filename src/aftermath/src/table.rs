//! Mutex-guarded record tables owned by each domain

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// A keyed record table shared by a domain's extractor views
///
/// Every mutation happens under the one lock. Reads for export take a
/// snapshot after the walks have joined.
#[derive(Debug)]
pub struct Table<T> {
    rows: Mutex<BTreeMap<String, T>>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Mutex::new(BTreeMap::new()),
        }
    }
}

impl<T> Table<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the table for a batch of mutations
    pub fn lock(&self) -> MutexGuard<'_, BTreeMap<String, T>> {
        self.rows.lock().unwrap()
    }

    pub fn insert(&self, key: impl Into<String>, value: T) -> Option<T> {
        self.lock().insert(key.into(), value)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl<T: Clone> Table<T> {
    pub fn get(&self, key: &str) -> Option<T> {
        self.lock().get(key).cloned()
    }

    /// Copy of all rows in key order
    pub fn snapshot(&self) -> BTreeMap<String, T> {
        self.lock().clone()
    }
}
