use std::process::ExitCode;

/// Exit status for bibbias commands.
///
/// - `Success` (0): Command completed, including runs with unresolved names
/// - `Failure` (1): Command refused to proceed (e.g. `--strict` pairing check, existing config)
/// - `Error` (2): Command failed due to an internal error (I/O, malformed cache, bad config)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
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
