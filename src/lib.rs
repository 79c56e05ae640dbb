//! Convoglot - translation synchronization for conversational workspaces
//!
//! Convoglot extracts the translatable text of a conversational assistant
//! workspace (intent examples, entity values and synonyms, dialog responses),
//! keeps it in capacity-bounded bundles of a translation store, and writes the
//! translated strings back into a localized copy of the workspace.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Pure synchronization engine (extract, diff, partition, rehydrate)
//! - `changelog`: Per-unit change notes and the change log file
//! - `error`: Fatal error kinds of a run
//! - `remote`: Workspace service and bundle store clients
//! - `sync`: Export and import orchestration
//! - `utils`: Shared utility functions

pub mod changelog;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod remote;
pub mod sync;
pub mod utils;
