//! CLI-specific error types and exit code mapping

use sqlproxy_core::error::{SqlProxyError, TransformError};
use sqlproxy_injector::InjectError;

/// CLI-specific error type.
///
/// The `exit_code()` method maps errors to process exit codes so that a
/// kustomize pipeline can tell a bad function config from a bad document.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Settings or function config loading/validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A targeted document could not be transformed.
    #[error("{0}")]
    Document(String),

    /// The input is not a usable ResourceList.
    #[error("{0}")]
    Envelope(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (stdin read, file write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from sqlproxy-core without a dedicated category.
    #[error("{0}")]
    Core(SqlProxyError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                  |
    /// |------|------------------------------------------|
    /// | 0    | Success                                  |
    /// | 1    | General / command error                  |
    /// | 2    | Settings or function config error        |
    /// | 3    | Document error (metadata, container path)|
    /// | 4    | ResourceList envelope error              |
    /// | 10   | IO error                                 |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Document(_) => 3,
            Self::Envelope(_) => 4,
            Self::Io(_) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(_) => 1,
        }
    }
}

impl From<SqlProxyError> for CliError {
    fn from(e: SqlProxyError) -> Self {
        match e {
            SqlProxyError::Config(e) => Self::Config(e.to_string()),
            SqlProxyError::Transform(TransformError::Configuration(msg)) => Self::Config(msg),
            SqlProxyError::Transform(e @ TransformError::Document(_)) => {
                Self::Document(e.to_string())
            }
            SqlProxyError::Transform(e @ TransformError::Envelope(_)) => {
                Self::Envelope(e.to_string())
            }
            SqlProxyError::Io(e) => Self::Io(e),
            other => Self::Core(other),
        }
    }
}

impl From<InjectError> for CliError {
    fn from(e: InjectError) -> Self {
        SqlProxyError::from(e).into()
    }
}
