//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::exitcode;
use crate::infrastructure::traits::ApiError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => exitcode::IOERR,
                InfraError::InvalidUrl { .. } => exitcode::CONFIG,
                InfraError::HttpClient { .. } => exitcode::SOFTWARE,
                InfraError::Application(e) => application_exit_code(e),
            },
        }
    }
}

fn application_exit_code(e: &ApplicationError) -> i32 {
    match e {
        ApplicationError::Domain(_) => exitcode::USAGE,
        ApplicationError::Api(api) => match api {
            ApiError::Status { status: 401 | 403, .. } => exitcode::NOPERM,
            ApiError::Status { status: 404, .. } => exitcode::NOINPUT,
            ApiError::Status { .. } | ApiError::Transport { .. } => exitcode::UNAVAILABLE,
            ApiError::Decode { .. } => exitcode::DATAERR,
        },
        ApplicationError::Config { .. } => exitcode::CONFIG,
        ApplicationError::PagerFailed { .. } => exitcode::FAILURE,
        ApplicationError::EditorFailed { .. } => exitcode::SOFTWARE,
        ApplicationError::OperationFailed { .. } => exitcode::IOERR,
    }
}
