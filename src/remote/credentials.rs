//! Credential files for the two remote services.
//!
//! ```json
//! { "username": "...", "password": "..." }                               // workspace
//! { "url": "...", "instanceId": "...", "userId": "...", "password": "..." } // bundles
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{SyncError, SyncResult};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorkspaceCredentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl WorkspaceCredentials {
    pub fn load(path: &Path) -> SyncResult<Self> {
        let credentials: Self = read_json(path)?;
        require(path, "username", &credentials.username)?;
        require(path, "password", &credentials.password)?;
        Ok(credentials)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleCredentials {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub instance_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub password: String,
}

impl BundleCredentials {
    pub fn load(path: &Path) -> SyncResult<Self> {
        let credentials: Self = read_json(path)?;
        require(path, "url", &credentials.url)?;
        require(path, "instanceId", &credentials.instance_id)?;
        require(path, "userId", &credentials.user_id)?;
        require(path, "password", &credentials.password)?;
        Ok(credentials)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> SyncResult<T> {
    let content = fs::read_to_string(path)
        .map_err(|e| SyncError::config(format!("cannot read credentials file {}: {}", path.display(), e)))?;
    serde_json::from_str(&content)
        .map_err(|e| SyncError::config(format!("invalid credentials file {}: {}", path.display(), e)))
}

fn require(path: &Path, field: &str, value: &str) -> SyncResult<()> {
    if value.trim().is_empty() {
        return Err(SyncError::config(format!(
            "credentials file {} is missing '{}'",
            path.display(),
            field
        )));
    }
    Ok(())
}
