//! Error types for scanner providers

use std::time::Duration;

use pera_router::RouterError;
use thiserror::Error;

/// Errors a scanner operation can return
#[derive(Error, Debug)]
pub enum ScannerError {
    /// Operation needs an open scanner
    #[error("Scanner is not open")]
    NotOpen,

    /// No barcode was read in time
    #[error("No barcode read within {0:?}")]
    Timeout(Duration),

    /// Scan was cancelled before completing
    #[error("Scan cancelled")]
    Cancelled,

    /// Provider does not implement the operation
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Vendor device or driver failure
    #[error("Device error: {0}")]
    Device(String),

    /// No provider could be resolved for this device
    #[error(transparent)]
    Router(#[from] RouterError),
}

impl ScannerError {
    /// Create a device error with a message
    pub fn device(message: impl Into<String>) -> Self {
        Self::Device(message.into())
    }

    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported(operation.into())
    }
}

pub type Result<T> = std::result::Result<T, ScannerError>;
