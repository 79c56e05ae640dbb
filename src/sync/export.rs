//! Export: extract the workspace text and reconcile it with the bundle store.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::core::Region;
use crate::core::diff::diff;
use crate::core::extract::extract;
use crate::core::key::expand_collisions;
use crate::core::partition::{BundleGroup, Partition, merged};
use crate::core::reconcile::{BundleEffect, execute, plan};
use crate::error::{SyncError, SyncResult};
use crate::remote::{BundleChanges, BundleInfo, BundleStore, WorkspaceApi};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub workspace_id: String,
    pub version: String,
    /// Prefix of every bundle name, usually the workspace id.
    pub bundle_prefix: String,
    pub target_languages: BTreeSet<String>,
    pub capacity: usize,
}

/// Result of reconciling one region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOutcome {
    pub region: Region,
    /// Entries the workspace currently produces for this region.
    pub entries: usize,
    /// Size of the change set; 0 when the store was already up to date.
    pub changes: usize,
    /// Existing bundles whose target languages were extended.
    pub languages_updated: Vec<String>,
    pub effects: Vec<BundleEffect>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub source_language: String,
    pub groups: Vec<GroupOutcome>,
}

impl ExportReport {
    pub fn effects(&self) -> Vec<(Region, BundleEffect)> {
        self.groups
            .iter()
            .flat_map(|group| group.effects.iter().map(|effect| (group.region, effect.clone())))
            .collect()
    }

    pub fn is_unchanged(&self) -> bool {
        self.groups
            .iter()
            .all(|group| group.changes == 0 && group.languages_updated.is_empty())
    }
}

pub fn export(
    workspace: &dyn WorkspaceApi,
    store: &dyn BundleStore,
    options: &ExportOptions,
) -> SyncResult<ExportReport> {
    if options.target_languages.is_empty() {
        return Err(SyncError::config("at least one target language is required"));
    }

    let document = workspace.fetch(&options.workspace_id, &options.version)?;
    let source_language = document.language()?.to_string();
    let extraction = extract(&document);
    let bundle_ids = store.list_bundle_ids()?;
    info!(
        workspace = %options.workspace_id,
        source = %source_language,
        bundles = bundle_ids.len(),
        "exporting workspace"
    );

    let mut groups = Vec::with_capacity(Region::ALL.len());

    for region in Region::ALL {
        let group = BundleGroup::new(&options.bundle_prefix, region);
        let mut partitions = Vec::new();
        let mut languages_updated = Vec::new();
        // Bundles created in this group carry every language its members carry.
        let mut group_languages = options.target_languages.clone();

        for (sequence, name) in group.members(&bundle_ids) {
            let info = store.bundle_info(&name)?;
            let targets: BTreeSet<String> = info
                .target_languages
                .union(&options.target_languages)
                .cloned()
                .collect();
            if targets != info.target_languages {
                store.update_bundle(
                    &name,
                    &BundleChanges {
                        target_languages: Some(targets.clone()),
                    },
                )?;
                info!(bundle = %name, "extended target languages");
                languages_updated.push(name.clone());
            }
            group_languages.extend(targets);
            let entries = store.resource_strings(&name, &source_language)?;
            partitions.push(Partition {
                name,
                sequence,
                entries,
            });
        }

        let local = expand_collisions(extraction.region(region));
        let remote = merged(&partitions);
        let (changes, effects) = match diff(&remote, &local) {
            None => {
                debug!(group = group.base(), "bundles already up to date");
                (0, Vec::new())
            }
            Some(changes) => {
                info!(group = group.base(), changes = changes.len(), "reconciling bundles");
                let ops = plan(&changes, &partitions, &group, options.capacity);
                let template = BundleInfo::new(&source_language, group_languages);
                (changes.len(), execute(store, ops, &template)?)
            }
        };

        groups.push(GroupOutcome {
            region,
            entries: local.len(),
            changes,
            languages_updated,
            effects,
        });
    }

    Ok(ExportReport {
        source_language,
        groups,
    })
}
