use std::path::Path;

use anyhow::Result;

use super::helper::{finish, open_session};
use super::{CommandResult, CommandSummary};
use crate::changelog::{render_effects, write_log};
use crate::cli::args::ExportCommand;
use crate::remote::{BundleStore, WorkspaceApi};
use crate::sync::{self, ExportOptions};
use crate::utils::parse_languages;

pub fn export(cmd: ExportCommand) -> Result<CommandResult> {
    let args = cmd.args;
    let target_languages = parse_languages(&args.target_language);
    let session = open_session(&args)?;

    let options = ExportOptions {
        workspace_id: args.source_workspace.clone(),
        version: args.version_date.clone(),
        bundle_prefix: args.bundle_prefix().to_string(),
        target_languages: target_languages.into_iter().collect(),
        capacity: session.config.bundle_capacity,
    };
    run_export(
        &session.workspace,
        &session.store,
        &options,
        &session.log_file,
        args.strict,
    )
}

/// Run an export against the given collaborators and write its change log.
pub fn run_export(
    workspace: &dyn WorkspaceApi,
    store: &dyn BundleStore,
    options: &ExportOptions,
    log_file: &Path,
    strict: bool,
) -> Result<CommandResult> {
    let report = sync::export(workspace, store, options)?;
    write_log(log_file, &render_effects(&report.effects()))?;
    Ok(finish(
        CommandSummary::Export(report),
        0,
        strict,
        log_file,
    ))
}
