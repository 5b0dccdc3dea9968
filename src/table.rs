//! Append-only per-path storage.

use std::collections::BTreeMap;

use crate::PathId;

/// Per-path values keyed by [`PathId`].
///
/// Entries are inserted with a default on first use and never removed, so a
/// path that disappears and comes back keeps its history.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathTable<T> {
    entries: BTreeMap<PathId, T>,
}

impl<T> Default for PathTable<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T: Clone> PathTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of paths ever seen.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, path: PathId) -> Option<&T> {
        self.entries.get(&path)
    }

    /// Get the entry for `path`, inserting `default` first if it is new.
    pub fn entry_or(&mut self, path: PathId, default: T) -> &mut T {
        self.entries.entry(path).or_insert(default)
    }

    /// Make sure paths `0..n` all have an entry. Returns how many were added.
    pub fn grow_to(&mut self, n: usize, default: T) -> usize {
        let mut added = 0;
        for path in 0..n {
            if !self.entries.contains_key(&path) {
                self.entries.insert(path, default.clone());
                added += 1;
            }
        }
        added
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.values_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PathId, &T)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }
}

impl<T: Clone + Default> PathTable<T> {
    /// Copy of the first `n` entries in path order, defaulting any gaps.
    pub fn prefix(&self, n: usize) -> Vec<T> {
        (0..n)
            .map(|p| self.entries.get(&p).cloned().unwrap_or_default())
            .collect()
    }
}
