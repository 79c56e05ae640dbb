//! Error types shared by the synchronization engine and its collaborators.
//!
//! Only run-terminating failures live here. A single resource string that is
//! rejected while rehydrating (too long, duplicated, untranslated) is not an
//! error; it is recorded as a [`crate::changelog::ChangeNote`] and the run
//! continues.

use thiserror::Error;

/// Fatal failure of a synchronization run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Missing or invalid credentials, languages or configuration values.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A remote service answered with a non-success status or could not be reached.
    #[error("{service} {operation} failed: {message}")]
    Remote {
        service: &'static str,
        operation: String,
        message: String,
    },

    /// The workspace document lacks a field the engine relies on.
    #[error("workspace document is malformed: {0}")]
    DataShape(String),

    /// The bundle store holds no translated strings for the requested language.
    #[error("no translated resource strings found for language '{0}'")]
    NothingToImport(String),
}

impl SyncError {
    pub fn config(message: impl Into<String>) -> Self {
        SyncError::Configuration(message.into())
    }

    pub fn remote(
        service: &'static str,
        operation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        SyncError::Remote {
            service,
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Short label used when printing the diagnostic at the process boundary.
    pub fn kind(&self) -> &'static str {
        match self {
            SyncError::Configuration(_) => "configuration",
            SyncError::Remote { .. } => "remote",
            SyncError::DataShape(_) => "data-shape",
            SyncError::NothingToImport(_) => "nothing-to-import",
        }
    }
}

pub type SyncResult<T> = Result<T, SyncError>;
