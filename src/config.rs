use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::core::partition::BUNDLE_CAPACITY;
use crate::core::rehydrate::ENTITY_VALUE_MAX_LENGTH;
use crate::remote::Timeouts;

pub const CONFIG_FILE_NAME: &str = ".convoglotrc.json";

/// Upper bound accepted for `bundleCapacity`.
pub const MAX_BUNDLE_CAPACITY: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_workspace_api_url")]
    pub workspace_api_url: String,
    #[serde(default = "default_bundle_capacity")]
    pub bundle_capacity: usize,
    #[serde(default = "default_entity_value_max_length")]
    pub entity_value_max_length: usize,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_workspace_api_url() -> String {
    "https://watson-api-explorer.mybluemix.net/conversation/api/v1".to_string()
}

fn default_bundle_capacity() -> usize {
    BUNDLE_CAPACITY
}

fn default_entity_value_max_length() -> usize {
    ENTITY_VALUE_MAX_LENGTH
}

fn default_connect_timeout_secs() -> u64 {
    15
}

fn default_read_timeout_secs() -> u64 {
    10
}

fn default_log_file() -> String {
    "convoglot.log".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workspace_api_url: default_workspace_api_url(),
            bundle_capacity: default_bundle_capacity(),
            entity_value_max_length: default_entity_value_max_length(),
            connect_timeout_secs: default_connect_timeout_secs(),
            read_timeout_secs: default_read_timeout_secs(),
            log_file: default_log_file(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.bundle_capacity == 0 || self.bundle_capacity > MAX_BUNDLE_CAPACITY {
            bail!(
                "Invalid 'bundleCapacity': {} (expected 1..={})",
                self.bundle_capacity,
                MAX_BUNDLE_CAPACITY
            );
        }
        if self.entity_value_max_length == 0 {
            bail!("Invalid 'entityValueMaxLength': must be greater than 0");
        }
        if self.workspace_api_url.trim().is_empty() {
            bail!("Invalid 'workspaceApiUrl': must not be empty");
        }
        Ok(())
    }

    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            connect: Duration::from_secs(self.connect_timeout_secs),
            read: Duration::from_secs(self.read_timeout_secs),
        }
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
