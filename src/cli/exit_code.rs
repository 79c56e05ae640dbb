use super::commands::CommandResult;
use super::exit_status::ExitStatus;

/// Rejected units only fail the run under `--strict`.
pub fn exit_status_from_result(result: &CommandResult) -> ExitStatus {
    if result.strict && result.rejected_count > 0 {
        ExitStatus::Failure
    } else {
        ExitStatus::Success
    }
}
