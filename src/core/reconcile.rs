//! Reconciliation of a change set against the physical bundles of a group.
//!
//! Planning is pure: [`plan`] turns a change set and the current partitions
//! into an ordered list of [`BundleOp`]s. [`execute`] then applies them one by
//! one through a [`BundleStore`]. The first failing call aborts the run and
//! operations already applied stay applied.
//!
//! Upserted keys that already live in some partition are removed from it
//! before the addition batch is placed, so a key never ends up in two
//! partitions of the same group.

use std::collections::BTreeSet;

use tracing::{debug, info};

use super::Entries;
use super::diff::ChangeSet;
use super::partition::{BundleGroup, Partition, layout, next_sequence, pick_merge_target};
use crate::error::SyncResult;
use crate::remote::{BundleInfo, BundleStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleOp {
    Delete { name: String },
    Replace { name: String, entries: Entries },
    Create { name: String, entries: Entries },
}

/// What an applied operation did, for the run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleEffect {
    Created { name: String, entries: usize },
    Updated { name: String, entries: usize },
    Deleted { name: String },
}

impl BundleEffect {
    pub fn name(&self) -> &str {
        match self {
            BundleEffect::Created { name, .. }
            | BundleEffect::Updated { name, .. }
            | BundleEffect::Deleted { name } => name,
        }
    }
}

/// Plan the operations that bring `partitions` in line with `changes`.
///
/// Deletions come first, then replacements of surviving partitions, then new
/// partitions. Partitions emptied by the deletion pass are never merge targets.
pub fn plan(
    changes: &ChangeSet,
    partitions: &[Partition],
    group: &BundleGroup,
    capacity: usize,
) -> Vec<BundleOp> {
    let mut working: Vec<Partition> = partitions.to_vec();
    let mut touched: BTreeSet<usize> = BTreeSet::new();

    let removed_keys = changes
        .tombstones()
        .chain(changes.upserts().map(|(key, _)| key));
    for key in removed_keys {
        for (index, partition) in working.iter_mut().enumerate() {
            if partition.entries.remove(key).is_some() {
                touched.insert(index);
            }
        }
    }

    let emptied: BTreeSet<usize> = touched
        .iter()
        .copied()
        .filter(|index| working[*index].is_empty())
        .collect();

    let batch: Entries = changes
        .upserts()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let mut created = Vec::new();
    if !batch.is_empty() {
        let candidates: Vec<Partition> = working
            .iter()
            .enumerate()
            .filter(|(index, _)| !emptied.contains(index))
            .map(|(_, partition)| partition.clone())
            .collect();
        let target = pick_merge_target(&candidates, batch.len(), capacity)
            .and_then(|candidate| working.iter().position(|p| p.sequence == candidates[candidate].sequence));

        match target {
            Some(index) => {
                debug!(bundle = %working[index].name, keys = batch.len(), "merging additions");
                working[index].entries.extend(batch);
                touched.insert(index);
            }
            None => {
                created = layout(group, &batch, capacity, next_sequence(partitions));
            }
        }
    }

    let mut ops: Vec<BundleOp> = emptied
        .iter()
        .map(|index| BundleOp::Delete {
            name: working[*index].name.clone(),
        })
        .collect();
    ops.extend(
        touched
            .iter()
            .filter(|index| !emptied.contains(index))
            .map(|index| BundleOp::Replace {
                name: working[*index].name.clone(),
                entries: working[*index].entries.clone(),
            }),
    );
    ops.extend(created.into_iter().map(|partition| BundleOp::Create {
        name: partition.name,
        entries: partition.entries,
    }));
    ops
}

/// Apply planned operations in order. New bundles are created from `template`.
pub fn execute(
    store: &dyn BundleStore,
    ops: Vec<BundleOp>,
    template: &BundleInfo,
) -> SyncResult<Vec<BundleEffect>> {
    let mut effects = Vec::with_capacity(ops.len());
    for op in ops {
        let effect = match op {
            BundleOp::Delete { name } => {
                store.delete_bundle(&name)?;
                info!(bundle = %name, "deleted emptied bundle");
                BundleEffect::Deleted { name }
            }
            BundleOp::Replace { name, entries } => {
                store.upload_resource_strings(&name, &template.source_language, &entries)?;
                info!(bundle = %name, entries = entries.len(), "updated bundle");
                BundleEffect::Updated {
                    name,
                    entries: entries.len(),
                }
            }
            BundleOp::Create { name, entries } => {
                store.create_bundle(&name, template)?;
                store.upload_resource_strings(&name, &template.source_language, &entries)?;
                info!(bundle = %name, entries = entries.len(), "created bundle");
                BundleEffect::Created {
                    name,
                    entries: entries.len(),
                }
            }
        };
        effects.push(effect);
    }
    Ok(effects)
}
