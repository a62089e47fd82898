//! Router error types

use thiserror::Error;

use crate::ManufacturerKey;

/// Result type alias using the router's error type.
pub type Result<T> = std::result::Result<T, RouterError>;

/// Failure produced by a provider loader.
///
/// Carries the identity of the module the loader tried to obtain so callers
/// know which optional dependency to install.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{module}: {detail}")]
pub struct LoadError {
    /// Package or module identifier the loader was after
    pub module: String,
    /// What went wrong
    pub detail: String,
}

impl LoadError {
    pub fn new(module: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            detail: detail.into(),
        }
    }

    /// The module is not present in this build
    pub fn not_installed(module: impl Into<String>) -> Self {
        let module = module.into();
        let detail = format!("module '{}' is not installed", module);
        Self { module, detail }
    }
}

/// Errors surfaced from a router access
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// No loader registered for the detected manufacturer
    #[error("No provider registered for manufacturer: {key}")]
    UnknownManufacturer { key: ManufacturerKey },

    /// A loader matched but could not produce a provider
    #[error("provider module '{module}' failed to load for manufacturer {key}: {detail}")]
    LoaderFailure {
        key: ManufacturerKey,
        module: String,
        detail: String,
    },

    /// A loader matched but panicked instead of returning
    #[error("loader for {key} panicked: {message}")]
    LoaderPanicked {
        key: ManufacturerKey,
        message: String,
    },

    /// Failure chosen by a caller-supplied missing-provider hook
    #[error("{0}")]
    Custom(String),
}

impl RouterError {
    /// Create a custom error with a message
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }

    pub(crate) fn loader_failure(key: &ManufacturerKey, err: LoadError) -> Self {
        Self::LoaderFailure {
            key: key.clone(),
            module: err.module,
            detail: err.detail,
        }
    }

    /// The manufacturer key involved, when the error carries one
    pub fn key(&self) -> Option<&ManufacturerKey> {
        match self {
            Self::UnknownManufacturer { key }
            | Self::LoaderFailure { key, .. }
            | Self::LoaderPanicked { key, .. } => Some(key),
            Self::Custom(_) => None,
        }
    }
}
