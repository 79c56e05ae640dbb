//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `export`: Push workspace text into the bundle store
//! - `import`: Pull translations back into a workspace
//! - `init`: Initialize convoglot configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Export(cmd)) => cmd.args.verbose,
            Some(Command::Import(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Arguments shared by export and import.
#[derive(Debug, Clone, Args)]
pub struct SyncArgs {
    /// Id of the workspace to read
    #[arg(short = 's', long, env = "CONVOGLOT_SOURCE_WORKSPACE")]
    pub source_workspace: String,

    /// API version date of the workspace service, e.g. 2018-09-20
    #[arg(short = 'v', long, env = "CONVOGLOT_VERSION_DATE")]
    pub version_date: String,

    /// Prefix of bundle names (defaults to the source workspace id)
    #[arg(short = 'b', long, env = "CONVOGLOT_BUNDLE_PREFIX")]
    pub bundle_prefix: Option<String>,

    /// JSON file with workspace service credentials
    #[arg(short = 'j', long, env = "CONVOGLOT_WORKSPACE_CREDS")]
    pub workspace_creds: PathBuf,

    /// JSON file with bundle store credentials
    #[arg(short = 'g', long, env = "CONVOGLOT_BUNDLE_CREDS")]
    pub bundle_creds: PathBuf,

    /// Target languages, comma separated
    #[arg(short = 't', long, value_delimiter = ',', env = "CONVOGLOT_TARGET_LANGUAGE")]
    pub target_language: Vec<String>,

    /// Change log path (overrides config file)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Exit with status 1 when some units could not be applied
    #[arg(long)]
    pub strict: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,
}

impl SyncArgs {
    pub fn bundle_prefix(&self) -> &str {
        self.bundle_prefix
            .as_deref()
            .filter(|prefix| !prefix.is_empty())
            .unwrap_or(&self.source_workspace)
    }
}

#[derive(Debug, Args)]
pub struct ExportCommand {
    #[command(flatten)]
    pub args: SyncArgs,
}

#[derive(Debug, Args)]
pub struct ImportCommand {
    #[command(flatten)]
    pub common: SyncArgs,

    /// Workspace to update with the translation (a new one is created when omitted)
    #[arg(short = 'w', long, env = "CONVOGLOT_TARGET_WORKSPACE")]
    pub target_workspace: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract workspace text and synchronize it with the bundle store
    #[command(alias = "wcs-to-gp")]
    Export(ExportCommand),
    /// Write translated strings from the bundle store into a workspace
    #[command(alias = "gp-to-wcs")]
    Import(ImportCommand),
    /// Initialize a new .convoglotrc.json configuration file
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Arguments {
        Arguments::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_export_args() {
        let args = parse(&[
            "convoglot", "export", "-s", "ws-1", "-v", "2018-09-20", "-j", "ws.json", "-g", "gp.json",
            "-t", "fr,de",
        ]);
        let Some(Command::Export(cmd)) = args.command else {
            panic!("expected export");
        };
        assert_eq!(cmd.args.source_workspace, "ws-1");
        assert_eq!(cmd.args.target_language, vec!["fr", "de"]);
        assert_eq!(cmd.args.bundle_prefix(), "ws-1");
        assert!(!cmd.args.strict);
    }

    #[test]
    fn test_import_alias_and_target_workspace() {
        let args = parse(&[
            "convoglot", "gp-to-wcs", "-s", "ws-1", "-v", "2018-09-20", "-j", "ws.json", "-g", "gp.json",
            "-t", "fr", "-b", "bot", "-w", "ws-2", "--verbose",
        ]);
        assert!(args.verbose());
        let Some(Command::Import(cmd)) = args.command else {
            panic!("expected import");
        };
        assert_eq!(cmd.common.bundle_prefix(), "bot");
        assert_eq!(cmd.target_workspace.as_deref(), Some("ws-2"));
    }

    #[test]
    fn test_export_alias() {
        let args = parse(&[
            "convoglot", "wcs-to-gp", "-s", "ws-1", "-v", "2018-09-20", "-j", "a", "-g", "b", "-t", "fr",
        ]);
        assert!(matches!(args.command, Some(Command::Export(_))));
    }

    #[test]
    fn test_verify_cli() {
        Arguments::command().debug_assert();
    }
}
