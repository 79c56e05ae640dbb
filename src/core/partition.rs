//! Capacity-bounded bundle groups.
//!
//! A logical group such as `ws-intents` is stored as physical bundles
//! `ws-intents-1`, `ws-intents-2`, ... Each holds at most the configured
//! capacity of entries. Sequences start at 1 and are never reused within a run.

use super::{Entries, Region};

/// Default number of entries a single bundle may hold.
pub const BUNDLE_CAPACITY: usize = 300;

/// Naming scheme of one logical bundle group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleGroup {
    base: String,
}

impl BundleGroup {
    pub fn new(prefix: &str, region: Region) -> Self {
        Self {
            base: format!("{}-{}", prefix, region.role()),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn partition_name(&self, sequence: u32) -> String {
        format!("{}-{}", self.base, sequence)
    }

    /// Sequence number of a bundle id, or `None` when the id is not a member.
    ///
    /// The remainder after `<base>-` must be a positive decimal integer, so
    /// `ws-intents-2` belongs to `ws-intents` while `ws-intents-old` and
    /// `ws-intents-extra-1` do not.
    pub fn sequence_of(&self, bundle_id: &str) -> Option<u32> {
        let rest = bundle_id.strip_prefix(&self.base)?.strip_prefix('-')?;
        if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        rest.parse::<u32>().ok().filter(|sequence| *sequence > 0)
    }

    /// Member bundle ids with their sequences, in ascending sequence order.
    pub fn members<'a>(&self, bundle_ids: impl IntoIterator<Item = &'a String>) -> Vec<(u32, String)> {
        let mut members: Vec<(u32, String)> = bundle_ids
            .into_iter()
            .filter_map(|id| self.sequence_of(id).map(|sequence| (sequence, id.clone())))
            .collect();
        members.sort();
        members.dedup_by_key(|(sequence, _)| *sequence);
        members
    }
}

/// One physical bundle of a group together with its current entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub name: String,
    pub sequence: u32,
    pub entries: Entries,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn residual(&self, capacity: usize) -> usize {
        capacity.saturating_sub(self.entries.len())
    }
}

/// Split entries into consecutive chunks of at most `capacity`, keeping key order.
pub fn split(entries: &Entries, capacity: usize) -> Vec<Entries> {
    let capacity = capacity.max(1);
    let mut chunks: Vec<Entries> = Vec::new();
    for (key, value) in entries {
        match chunks.last_mut() {
            Some(chunk) if chunk.len() < capacity => {
                chunk.insert(key.clone(), value.clone());
            }
            _ => {
                let mut chunk = Entries::new();
                chunk.insert(key.clone(), value.clone());
                chunks.push(chunk);
            }
        }
    }
    chunks
}

/// First free sequence after every existing partition; 1 for a fresh group.
pub fn next_sequence(partitions: &[Partition]) -> u32 {
    partitions
        .iter()
        .map(|partition| partition.sequence)
        .max()
        .map_or(1, |max| max + 1)
}

/// Index of the partition that can absorb a whole batch of `batch_len` keys.
///
/// Picks the largest residual capacity; ties go to the lowest sequence.
pub fn pick_merge_target(partitions: &[Partition], batch_len: usize, capacity: usize) -> Option<usize> {
    partitions
        .iter()
        .enumerate()
        .filter(|(_, partition)| partition.residual(capacity) >= batch_len)
        .max_by(|(_, a), (_, b)| {
            a.residual(capacity)
                .cmp(&b.residual(capacity))
                .then_with(|| b.sequence.cmp(&a.sequence))
        })
        .map(|(index, _)| index)
}

/// Build new partitions for `entries`, numbered from `first_sequence`.
pub fn layout(group: &BundleGroup, entries: &Entries, capacity: usize, first_sequence: u32) -> Vec<Partition> {
    split(entries, capacity)
        .into_iter()
        .zip(first_sequence..)
        .map(|(entries, sequence)| Partition {
            name: group.partition_name(sequence),
            sequence,
            entries,
        })
        .collect()
}

/// Union of all partition entries; what the store currently holds for a group.
pub fn merged(partitions: &[Partition]) -> Entries {
    partitions
        .iter()
        .flat_map(|partition| partition.entries.iter())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
