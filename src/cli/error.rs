//! CLI-level errors (wraps registry and config errors)

use thiserror::Error;

use crate::config::ConfigError;
use crate::registry::RegistryError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Registry(#[from] RegistryError),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Usage(String),

    /// clap already rendered this one to stderr.
    #[error("invalid invocation ({0})")]
    Parse(clap::error::ErrorKind),

    #[error("{0:#}")]
    Leaf(anyhow::Error),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the exit code for this error. Failures are not differentiated.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Registry(_)
            | CliError::Config(_)
            | CliError::Usage(_)
            | CliError::Parse(_)
            | CliError::Leaf(_) => crate::exitcode::FAILURE,
        }
    }

    /// Whether the message still has to be shown to the user.
    pub fn needs_report(&self) -> bool {
        !matches!(self, CliError::Parse(_))
    }
}
