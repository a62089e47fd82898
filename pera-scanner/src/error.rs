//! Scanner configuration and loading errors

use std::path::PathBuf;

use thiserror::Error;

/// Errors reading scanner configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file exists but could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Config could not be serialized
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors loading a vendor scanner library
#[derive(Error, Debug)]
pub enum DylibError {
    /// No library file for the package
    #[error("Scanner library not found in {dir}")]
    LibraryNotFound { dir: PathBuf },

    /// Explicitly configured library path does not exist
    #[error("Scanner library {path} does not exist")]
    MissingPath { path: PathBuf },

    /// API version mismatch between pera and the library
    #[error("API version mismatch: pera expects {expected}, library has {found}")]
    ApiVersionMismatch { expected: u32, found: u32 },

    /// Failed to load dynamic library or resolve a symbol
    #[error("Failed to load scanner library: {0}")]
    LibraryLoad(#[from] libloading::Error),
}

impl DylibError {
    /// Whether the failure means the package is simply not installed
    pub fn is_not_installed(&self) -> bool {
        matches!(
            self,
            Self::LibraryNotFound { .. } | Self::MissingPath { .. }
        )
    }
}
