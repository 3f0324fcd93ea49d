use thiserror::Error;

/// Run-level error codes, shared by the CLI exit-code mapping and JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    Success = 0,
    GeneralError = 1,
    ConfigError = 11,
    SharedContext = 30,
    RunInProgress = 31,
    ServiceError = 40,
}

impl ErrorCode {
    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

/// Errors that abort a whole batch run before any task is dispatched.
///
/// Individual task failures never surface here; they are recorded on the task.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("failed to resolve shared context: {0}")]
    SharedContext(String),

    #[error("a batch run is already in progress")]
    RunInProgress,

    #[error("invalid batch configuration: {0}")]
    Config(String),
}

impl BatchError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::SharedContext(_) => ErrorCode::SharedContext,
            Self::RunInProgress => ErrorCode::RunInProgress,
            Self::Config(_) => ErrorCode::ConfigError,
        }
    }
}
