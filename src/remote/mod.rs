//! Remote collaborators: the workspace API and the bundle store.
//!
//! The engine only sees the [`WorkspaceApi`] and [`BundleStore`] traits.
//! HTTP clients live in `workspace` and `bundles`; `memory` holds in-process
//! implementations used by tests.

pub mod bundles;
pub mod credentials;
pub mod memory;
pub mod workspace;

use std::collections::BTreeSet;
use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::core::Entries;
use crate::core::document::WorkspaceDocument;
use crate::error::{SyncError, SyncResult};

pub use bundles::BundleClient;
pub use credentials::{BundleCredentials, WorkspaceCredentials};
pub use memory::{MemoryBundleStore, MemoryWorkspaceApi};
pub use workspace::WorkspaceClient;

// ============================================================
// Traits
// ============================================================

pub trait WorkspaceApi {
    /// Export a workspace including all of its regions.
    fn fetch(&self, workspace_id: &str, version: &str) -> SyncResult<WorkspaceDocument>;

    /// Create a workspace when `workspace_id` is `None`, otherwise update it.
    fn store(&self, workspace_id: Option<&str>, version: &str, document: &WorkspaceDocument) -> SyncResult<()>;
}

pub trait BundleStore {
    fn list_bundle_ids(&self) -> SyncResult<Vec<String>>;

    fn bundle_info(&self, name: &str) -> SyncResult<BundleInfo>;

    /// Strings of one language. A language the bundle does not hold yields no entries.
    fn resource_strings(&self, name: &str, language: &str) -> SyncResult<Entries>;

    fn create_bundle(&self, name: &str, info: &BundleInfo) -> SyncResult<()>;

    fn update_bundle(&self, name: &str, changes: &BundleChanges) -> SyncResult<()>;

    fn delete_bundle(&self, name: &str) -> SyncResult<()>;

    /// Replace the whole entry set of `language` in a bundle.
    fn upload_resource_strings(&self, name: &str, language: &str, entries: &Entries) -> SyncResult<()>;
}

// ============================================================
// Bundle Metadata
// ============================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleInfo {
    pub source_language: String,
    #[serde(default)]
    pub target_languages: BTreeSet<String>,
}

impl BundleInfo {
    pub fn new(source_language: &str, target_languages: impl IntoIterator<Item = String>) -> Self {
        Self {
            source_language: source_language.to_string(),
            target_languages: target_languages.into_iter().collect(),
        }
    }
}

/// Partial bundle update. Only the fields that are `Some` are changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_languages: Option<BTreeSet<String>>,
}

// ============================================================
// HTTP Helpers
// ============================================================

/// Transport timeouts shared by both HTTP clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub connect: Duration,
    pub read: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(15),
            read: Duration::from_secs(10),
        }
    }
}

pub(crate) fn build_http_client(service: &'static str, timeouts: Timeouts) -> SyncResult<Client> {
    Client::builder()
        .connect_timeout(timeouts.connect)
        .timeout(timeouts.read)
        .build()
        .map_err(|e| SyncError::remote(service, "build HTTP client", e.to_string()))
}

/// Parse a configured service URL; it must be able to carry path segments.
pub(crate) fn parse_base_url(service: &'static str, raw: &str) -> SyncResult<Url> {
    let url = Url::parse(raw)
        .map_err(|e| SyncError::config(format!("invalid {} URL '{}': {}", service, raw, e)))?;
    if url.cannot_be_a_base() {
        return Err(SyncError::config(format!("invalid {} URL '{}'", service, raw)));
    }
    Ok(url)
}

/// Append percent-encoded path segments to `base`.
pub(crate) fn join_segments(service: &'static str, base: &Url, segments: &[&str]) -> SyncResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| SyncError::config(format!("invalid {} URL '{}'", service, base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Read the body of a response whose status must equal one of `expected`.
pub(crate) fn expect_status(
    service: &'static str,
    operation: &str,
    response: reqwest::Result<Response>,
    expected: &[u16],
) -> SyncResult<String> {
    let response = response.map_err(|e| SyncError::remote(service, operation, describe_transport_error(&e)))?;
    let status = response.status();
    let body = response
        .text()
        .map_err(|e| SyncError::remote(service, operation, format!("failed to read response body: {}", e)))?;

    if !expected.contains(&status.as_u16()) {
        return Err(SyncError::remote(
            service,
            operation,
            format!("HTTP {}: {}", status.as_u16(), truncate(&body, 500)),
        ));
    }
    Ok(body)
}

pub(crate) fn parse_body<T: for<'de> Deserialize<'de>>(
    service: &'static str,
    operation: &str,
    body: &str,
) -> SyncResult<T> {
    serde_json::from_str(body)
        .map_err(|e| SyncError::remote(service, operation, format!("unexpected response format: {}", e)))
}

fn describe_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("timeout: {}", error)
    } else if error.is_connect() {
        format!("connection error: {}", error)
    } else {
        error.to_string()
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!("{}... (truncated)", head)
}
