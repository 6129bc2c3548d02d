//! Top-level error types for the command line tool.
//!
//! Pipeline failures carry their own taxonomy in [`crate::sea::Error`];
//! this module wraps them together with CLI and I/O failures.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, PackagerError>;

/// Main error type for the packager
#[derive(Error, Debug)]
pub enum PackagerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Pipeline errors
    #[error("{0}")]
    Pipeline(#[from] crate::sea::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Project directory does not exist
    #[error("Project directory not found: {path}")]
    ProjectNotFound {
        /// Path as given
        path: String,
    },
}

impl PackagerError {
    /// Actionable next step for this error, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            PackagerError::Pipeline(e) => e.hint(),
            PackagerError::Cli(CliError::ProjectNotFound { .. }) => {
                Some("pass the directory containing package.json with --project")
            }
            PackagerError::Cli(CliError::InvalidArguments { .. }) => {
                Some("run with --help to see the available options")
            }
            _ => None,
        }
    }
}
