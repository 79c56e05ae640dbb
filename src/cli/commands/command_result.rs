use std::path::PathBuf;

use crate::sync::{ExportReport, ImportReport};

#[derive(Debug)]
pub enum CommandSummary {
    Export(ExportReport),
    Import(ImportReport),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
}

/// Result of running convoglot commands
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    /// Units that could not be applied (untranslated, too long, duplicated).
    pub rejected_count: usize,
    /// If true, exit code 1 should be returned when rejected_count > 0.
    pub strict: bool,
    /// Where the change log was written, if any.
    pub log_file: Option<PathBuf>,
}

impl CommandResult {
    pub fn init() -> Self {
        Self {
            summary: CommandSummary::Init(InitSummary { created: true }),
            rejected_count: 0,
            strict: false,
            log_file: None,
        }
    }
}
