//! In-process implementations of the remote traits.
//!
//! Both keep their state behind `RefCell` so they can be shared by reference
//! like the HTTP clients. Every call is recorded, and individual calls can be
//! made to fail to exercise abort paths.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use super::{BundleChanges, BundleInfo, BundleStore, WorkspaceApi};
use crate::core::Entries;
use crate::core::document::WorkspaceDocument;
use crate::error::{SyncError, SyncResult};

const BUNDLE_SERVICE: &str = "bundle store";
const WORKSPACE_SERVICE: &str = "workspace API";

// ============================================================
// Bundle Store
// ============================================================

#[derive(Debug, Clone, Default)]
struct StoredBundle {
    info: BundleInfo,
    strings: BTreeMap<String, Entries>,
}

#[derive(Debug, Default)]
pub struct MemoryBundleStore {
    bundles: RefCell<BTreeMap<String, StoredBundle>>,
    calls: RefCell<Vec<String>>,
    failures: RefCell<BTreeSet<(String, String)>>,
}

impl MemoryBundleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a bundle holding `entries` in its source language.
    pub fn insert_bundle(&self, name: &str, source_language: &str, target_languages: &[&str], entries: Entries) {
        let info = BundleInfo::new(source_language, target_languages.iter().map(|l| l.to_string()));
        let mut strings = BTreeMap::new();
        strings.insert(source_language.to_string(), entries);
        self.bundles
            .borrow_mut()
            .insert(name.to_string(), StoredBundle { info, strings });
    }

    /// Seed translated strings of an existing bundle.
    pub fn set_strings(&self, name: &str, language: &str, entries: Entries) {
        if let Some(bundle) = self.bundles.borrow_mut().get_mut(name) {
            bundle.strings.insert(language.to_string(), entries);
        }
    }

    /// Make every later `operation` call on `name` fail.
    pub fn fail_on(&self, operation: &str, name: &str) {
        self.failures
            .borrow_mut()
            .insert((operation.to_string(), name.to_string()));
    }

    pub fn bundle_ids(&self) -> Vec<String> {
        self.bundles.borrow().keys().cloned().collect()
    }

    pub fn info(&self, name: &str) -> Option<BundleInfo> {
        self.bundles.borrow().get(name).map(|bundle| bundle.info.clone())
    }

    pub fn strings(&self, name: &str, language: &str) -> Entries {
        self.bundles
            .borrow()
            .get(name)
            .and_then(|bundle| bundle.strings.get(language))
            .cloned()
            .unwrap_or_default()
    }

    /// Calls received so far, e.g. `"delete_bundle ws-intents-2"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Calls that change state, in order.
    pub fn mutations(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| {
                !call.starts_with("list_bundle_ids")
                    && !call.starts_with("bundle_info")
                    && !call.starts_with("resource_strings")
            })
            .cloned()
            .collect()
    }

    fn record(&self, operation: &str, name: &str) -> SyncResult<()> {
        let call = if name.is_empty() {
            operation.to_string()
        } else {
            format!("{} {}", operation, name)
        };
        self.calls.borrow_mut().push(call.clone());
        if self
            .failures
            .borrow()
            .contains(&(operation.to_string(), name.to_string()))
        {
            return Err(SyncError::remote(BUNDLE_SERVICE, call, "HTTP 500: injected failure"));
        }
        Ok(())
    }

    fn missing(operation: &str, name: &str) -> SyncError {
        SyncError::remote(BUNDLE_SERVICE, format!("{} {}", operation, name), "HTTP 404: bundle not found")
    }
}

impl BundleStore for MemoryBundleStore {
    fn list_bundle_ids(&self) -> SyncResult<Vec<String>> {
        self.record("list_bundle_ids", "")?;
        Ok(self.bundle_ids())
    }

    fn bundle_info(&self, name: &str) -> SyncResult<BundleInfo> {
        self.record("bundle_info", name)?;
        self.info(name).ok_or_else(|| Self::missing("bundle_info", name))
    }

    fn resource_strings(&self, name: &str, language: &str) -> SyncResult<Entries> {
        self.record("resource_strings", name)?;
        let bundles = self.bundles.borrow();
        let bundle = bundles
            .get(name)
            .ok_or_else(|| Self::missing("resource_strings", name))?;
        Ok(bundle.strings.get(language).cloned().unwrap_or_default())
    }

    fn create_bundle(&self, name: &str, info: &BundleInfo) -> SyncResult<()> {
        self.record("create_bundle", name)?;
        let mut bundles = self.bundles.borrow_mut();
        if bundles.contains_key(name) {
            return Err(SyncError::remote(
                BUNDLE_SERVICE,
                format!("create_bundle {}", name),
                "HTTP 409: bundle already exists",
            ));
        }
        bundles.insert(
            name.to_string(),
            StoredBundle {
                info: info.clone(),
                strings: BTreeMap::new(),
            },
        );
        Ok(())
    }

    fn update_bundle(&self, name: &str, changes: &BundleChanges) -> SyncResult<()> {
        self.record("update_bundle", name)?;
        let mut bundles = self.bundles.borrow_mut();
        let bundle = bundles
            .get_mut(name)
            .ok_or_else(|| Self::missing("update_bundle", name))?;
        if let Some(targets) = &changes.target_languages {
            bundle.info.target_languages = targets.clone();
        }
        Ok(())
    }

    fn delete_bundle(&self, name: &str) -> SyncResult<()> {
        self.record("delete_bundle", name)?;
        self.bundles
            .borrow_mut()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| Self::missing("delete_bundle", name))
    }

    fn upload_resource_strings(&self, name: &str, language: &str, entries: &Entries) -> SyncResult<()> {
        self.record("upload_resource_strings", name)?;
        let mut bundles = self.bundles.borrow_mut();
        let bundle = bundles
            .get_mut(name)
            .ok_or_else(|| Self::missing("upload_resource_strings", name))?;
        bundle.strings.insert(language.to_string(), entries.clone());
        Ok(())
    }
}

// ============================================================
// Workspace API
// ============================================================

#[derive(Debug, Default)]
pub struct MemoryWorkspaceApi {
    workspaces: RefCell<BTreeMap<String, Value>>,
    stored: RefCell<Vec<(Option<String>, Value)>>,
}

impl MemoryWorkspaceApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workspace(workspace_id: &str, document: Value) -> Self {
        let api = Self::new();
        api.workspaces
            .borrow_mut()
            .insert(workspace_id.to_string(), document);
        api
    }

    /// Every `store` call as `(workspace id, document)`.
    pub fn stored(&self) -> Vec<(Option<String>, Value)> {
        self.stored.borrow().clone()
    }
}

impl WorkspaceApi for MemoryWorkspaceApi {
    fn fetch(&self, workspace_id: &str, _version: &str) -> SyncResult<WorkspaceDocument> {
        let workspaces = self.workspaces.borrow();
        let document = workspaces.get(workspace_id).ok_or_else(|| {
            SyncError::remote(
                WORKSPACE_SERVICE,
                format!("fetch workspace {}", workspace_id),
                "HTTP 404: workspace not found",
            )
        })?;
        WorkspaceDocument::from_value(document.clone())
    }

    fn store(&self, workspace_id: Option<&str>, _version: &str, document: &WorkspaceDocument) -> SyncResult<()> {
        let value = document.as_value();
        if let Some(id) = workspace_id {
            let mut workspaces = self.workspaces.borrow_mut();
            if !workspaces.contains_key(id) {
                return Err(SyncError::remote(
                    WORKSPACE_SERVICE,
                    format!("update workspace {}", id),
                    "HTTP 404: workspace not found",
                ));
            }
            workspaces.insert(id.to_string(), value.clone());
        }
        self.stored
            .borrow_mut()
            .push((workspace_id.map(str::to_string), value));
        Ok(())
    }
}
