use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::debug;

use super::{CommandResult, CommandSummary};
use crate::cli::args::SyncArgs;
use crate::config::{Config, load_config};
use crate::remote::{BundleClient, BundleCredentials, WorkspaceClient, WorkspaceCredentials};

/// Configuration and remote clients of one export or import run.
pub struct Session {
    pub config: Config,
    pub workspace: WorkspaceClient,
    pub store: BundleClient,
    pub log_file: PathBuf,
}

/// Load configuration and credentials, then build both HTTP clients.
///
/// Fails before any remote call is made.
pub fn open_session(args: &SyncArgs) -> Result<Session> {
    let loaded = load_config(&std::env::current_dir()?)?;
    debug!(from_file = loaded.from_file, "configuration loaded");
    let config = loaded.config;

    let workspace_credentials = WorkspaceCredentials::load(&args.workspace_creds)?;
    let bundle_credentials = BundleCredentials::load(&args.bundle_creds)?;

    let workspace = WorkspaceClient::new(
        &config.workspace_api_url,
        workspace_credentials,
        config.timeouts(),
    )?;
    let store = BundleClient::new(bundle_credentials, config.timeouts())?;
    let log_file = args
        .log_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.log_file));

    Ok(Session {
        config,
        workspace,
        store,
        log_file,
    })
}

pub fn finish(
    summary: CommandSummary,
    rejected_count: usize,
    strict: bool,
    log_file: &Path,
) -> CommandResult {
    CommandResult {
        summary,
        rejected_count,
        strict,
        log_file: Some(log_file.to_path_buf()),
    }
}
