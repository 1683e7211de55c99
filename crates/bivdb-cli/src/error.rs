//! CLI error types.

use thiserror::Error;

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors surfaced by the command-line front end.
#[derive(Debug, Error)]
pub enum CliError {
    /// Error raised by the engine or the store.
    #[error(transparent)]
    Core(#[from] bivdb_core::Error),

    /// Malformed command-line argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl CliError {
    /// Create an invalid argument error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        CliError::InvalidArgument(msg.into())
    }
}
