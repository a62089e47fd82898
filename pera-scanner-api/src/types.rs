//! Value types exchanged with scanner providers

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default time a single scan waits for a barcode
pub const DEFAULT_SCAN_TIMEOUT: Duration = Duration::from_secs(10);

/// Barcode symbology
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbology {
    QrCode,
    Code128,
    Code39,
    Ean13,
    Ean8,
    UpcA,
    DataMatrix,
    Pdf417,
    Other(String),
}

impl Symbology {
    pub fn as_str(&self) -> &str {
        match self {
            Self::QrCode => "qr_code",
            Self::Code128 => "code128",
            Self::Code39 => "code39",
            Self::Ean13 => "ean13",
            Self::Ean8 => "ean8",
            Self::UpcA => "upc_a",
            Self::DataMatrix => "data_matrix",
            Self::Pdf417 => "pdf417",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Symbology {
    type Err = std::convert::Infallible;

    /// Parse a vendor symbology name; anything unrecognized becomes `Other`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        Ok(match normalized.as_str() {
            "qr" | "qr_code" | "qrcode" => Self::QrCode,
            "code128" | "code_128" => Self::Code128,
            "code39" | "code_39" => Self::Code39,
            "ean13" | "ean_13" => Self::Ean13,
            "ean8" | "ean_8" => Self::Ean8,
            "upc_a" | "upca" => Self::UpcA,
            "data_matrix" | "datamatrix" => Self::DataMatrix,
            "pdf417" | "pdf_417" => Self::Pdf417,
            _ => Self::Other(s.trim().to_string()),
        })
    }
}

/// A decoded barcode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Barcode {
    pub text: String,
    pub symbology: Symbology,
    /// Raw bytes as delivered by the decoder
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub raw: Vec<u8>,
}

impl Barcode {
    pub fn new(text: impl Into<String>, symbology: Symbology) -> Self {
        let text = text.into();
        let raw = text.as_bytes().to_vec();
        Self {
            text,
            symbology,
            raw,
        }
    }
}

/// Parameters for a single scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOptions {
    pub timeout: Duration,
    /// Accepted symbologies; empty accepts anything the device decodes
    #[serde(default)]
    pub symbologies: Vec<Symbology>,
}

impl ScanOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_symbologies(mut self, symbologies: Vec<Symbology>) -> Self {
        self.symbologies = symbologies;
        self
    }

    /// Whether `symbology` passes this scan's filter
    pub fn accepts(&self, symbology: &Symbology) -> bool {
        self.symbologies.is_empty() || self.symbologies.contains(symbology)
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_SCAN_TIMEOUT,
            symbologies: Vec::new(),
        }
    }
}

/// Scanner provider metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerInfo {
    /// Provider name (e.g., "pax-a920")
    pub name: String,
    /// Hardware vendor
    pub vendor: String,
    /// Package the provider ships in
    pub package: String,
    pub version: String,
    /// API version the provider was built against
    #[serde(default = "default_api_version")]
    pub api_version: u32,
}

fn default_api_version() -> u32 {
    crate::SCANNER_API_VERSION
}
