//! Dispatch a parsed command line to its command handler.
//!
//! # Returns
//! - `Ok(CommandResult)` with the run summary and rejected unit count
//! - `Err` if the run was aborted (configuration, remote or data-shape error)
use anyhow::Result;

use super::{
    args::{Arguments, Command},
    commands::{CommandResult, export::export, import::import, init::init},
};

pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Export(cmd)) => export(cmd),
        Some(Command::Import(cmd)) => import(cmd),
        Some(Command::Init) => init(),
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    }
}
