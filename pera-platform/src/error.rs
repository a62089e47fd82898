//! Error types for manufacturer detection

use std::path::PathBuf;

use thiserror::Error;

/// Errors a manufacturer oracle can report
#[derive(Debug, Error)]
pub enum OracleError {
    /// Environment variable not set or empty
    #[error("environment variable {var} is not set")]
    NotSet { var: String },

    /// Required platform tool is not installed
    #[error("{tool} not found on PATH")]
    ToolNotFound { tool: String },

    /// Platform tool exited unsuccessfully
    #[error("{command} exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    /// Source file could not be read
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backend does not work on this platform
    #[error("{oracle} is not supported on this platform")]
    Unsupported { oracle: String },

    /// Every backend of a chain came back empty
    #[error("no oracle reported a manufacturer")]
    Exhausted,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OracleError>;
