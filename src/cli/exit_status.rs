use std::process::ExitCode;

/// Exit status of the CLI.
///
/// - `Success` (0): the template was written
/// - `Failure` (1): usage error, bad archive name or shape, malformed XML, I/O error
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// The template was written.
    Success,
    /// The run was aborted; nothing is written on failure.
    Failure,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
        }
    }
}
