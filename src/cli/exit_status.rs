use std::process::ExitCode;

/// Exit status for CLI commands.
///
/// - `Success` (0): Run completed
/// - `Failure` (1): Run completed but some units were rejected and `--strict` was given
/// - `Error` (2): Run aborted (configuration, remote or data-shape error)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Run completed.
    Success,
    /// Run completed with rejected units under `--strict`.
    Failure,
    /// Run aborted.
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
