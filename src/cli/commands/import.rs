use std::path::Path;

use anyhow::Result;

use super::helper::{finish, open_session};
use super::{CommandResult, CommandSummary};
use crate::changelog::{render_notes, write_log};
use crate::cli::args::ImportCommand;
use crate::remote::{BundleStore, WorkspaceApi};
use crate::sync::{self, ImportOptions, single_target_language};
use crate::utils::parse_languages;

pub fn import(cmd: ImportCommand) -> Result<CommandResult> {
    let args = cmd.common;
    let target_language = single_target_language(&parse_languages(&args.target_language))?;
    let session = open_session(&args)?;

    let options = ImportOptions {
        workspace_id: args.source_workspace.clone(),
        version: args.version_date.clone(),
        bundle_prefix: args.bundle_prefix().to_string(),
        target_language,
        target_workspace: cmd.target_workspace,
        max_value_length: session.config.entity_value_max_length,
    };
    run_import(
        &session.workspace,
        &session.store,
        &options,
        &session.log_file,
        args.strict,
    )
}

/// Run an import against the given collaborators and write its change log.
pub fn run_import(
    workspace: &dyn WorkspaceApi,
    store: &dyn BundleStore,
    options: &ImportOptions,
    log_file: &Path,
    strict: bool,
) -> Result<CommandResult> {
    let report = sync::import(workspace, store, options)?;
    write_log(log_file, &render_notes(&report.notes))?;
    let rejected_count = report.notes.len();
    Ok(finish(
        CommandSummary::Import(report),
        rejected_count,
        strict,
        log_file,
    ))
}
