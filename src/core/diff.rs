//! Change set computation between remote and freshly extracted entries.

use std::collections::BTreeMap;

use super::Entries;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Key is new locally or its source string changed.
    Upsert(String),
    /// Key exists remotely but no longer locally.
    Tombstone,
}

/// Ordered `key -> change` mapping. Never empty when produced by [`diff`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet(BTreeMap<String, Change>);

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, change: Change) {
        self.0.insert(key.into(), change);
    }

    pub fn get(&self, key: &str) -> Option<&Change> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Change)> {
        self.0.iter()
    }

    pub fn upserts(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter().filter_map(|(key, change)| match change {
            Change::Upsert(value) => Some((key, value)),
            Change::Tombstone => None,
        })
    }

    pub fn tombstones(&self) -> impl Iterator<Item = &String> {
        self.0
            .iter()
            .filter(|(_, change)| matches!(change, Change::Tombstone))
            .map(|(key, _)| key)
    }
}

/// Compare remote entries with local ones.
///
/// Returns `None` when both sides hold exactly the same keys and values.
pub fn diff(remote: &Entries, local: &Entries) -> Option<ChangeSet> {
    let mut changes = ChangeSet::new();

    for (key, value) in local {
        if remote.get(key) != Some(value) {
            changes.insert(key.clone(), Change::Upsert(value.clone()));
        }
    }
    for key in remote.keys() {
        if !local.contains_key(key) {
            changes.insert(key.clone(), Change::Tombstone);
        }
    }

    if changes.is_empty() {
        None
    } else {
        Some(changes)
    }
}
