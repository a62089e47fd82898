//! pera-scanner - The barcode scanner for whatever device the app runs on
//!
//! [`barcode_scanner`] returns a [`ScannerRouter`] that application code
//! uses like any [`BarcodeScanner`]. Nothing is detected or loaded until the
//! first call; then the device manufacturer picks a vendor package and that
//! package's library is loaded once.
//!
//! # Example
//!
//! ```no_run
//! use pera_scanner::{BarcodeScanner, ConfigLoader, ScanOptions, barcode_scanner};
//!
//! let config = ConfigLoader::load().unwrap_or_default();
//! let scanner = barcode_scanner(&config);
//!
//! scanner.open()?;
//! let barcode = scanner.scan(&ScanOptions::default())?;
//! println!("{} ({})", barcode.text, barcode.symbology);
//! # Ok::<(), pera_scanner::ScannerError>(())
//! ```

pub mod config;
pub mod dylib;
pub mod error;

use std::sync::Arc;

use pera_platform::{ManufacturerOracle, SystemOracle, key_provider};
use pera_router::{ProviderRegistry, Router, RouterError};

pub use config::{ConfigLoader, ProviderEntry, RawScannerConfig, ScannerConfig};
pub use dylib::{DylibLoader, LoadedScanner, install_hint};
pub use error::{ConfigError, DylibError};
pub use pera_scanner_api::{
    Barcode, BarcodeScanner, SCANNER_API_VERSION, ScanOptions, ScannerError, ScannerInfo,
    ScannerRouter, Symbology,
};

/// Manufacturer key of PAX payment terminals
pub const PAX_MANUFACTURER: &str = "PAX";

/// Vendor package providing the PAX A920 scanner
pub const PAX_PACKAGE: &str = "diva.pax-a920-barcode-scanner";

/// Manufacturer key of the built-in simulated scanner
#[cfg(feature = "sim")]
pub const SIMULATOR_MANUFACTURER: &str = "SIMULATOR";

/// Build the provider registry described by `config`.
///
/// Built-in providers are registered first so configured entries can
/// replace them.
pub fn scanner_registry(config: &ScannerConfig) -> ProviderRegistry<dyn BarcodeScanner> {
    let mut registry: ProviderRegistry<dyn BarcodeScanner> = ProviderRegistry::new();

    #[cfg(feature = "sim")]
    registry.register(SIMULATOR_MANUFACTURER, || {
        Ok(Arc::new(pera_sim_scanner::SimScanner::default()) as Arc<dyn BarcodeScanner>)
    });

    for (key, entry) in &config.providers {
        let loader = DylibLoader::new(entry, &config.scanner_dir);
        let manufacturer = key.as_str().to_string();
        registry.register(key.clone(), move || loader.load_provider(&manufacturer));
    }

    registry
}

/// Failure for a device with no scanner integration
fn no_integration(key: &pera_router::ManufacturerKey) -> RouterError {
    RouterError::custom(format!(
        "No barcode scanner integration for manufacturer: {}",
        key
    ))
}

/// Barcode scanner for the current device.
///
/// The manufacturer comes from the config override if set, otherwise from
/// device detection ([`SystemOracle`]).
pub fn barcode_scanner(config: &ScannerConfig) -> ScannerRouter {
    let oracle = SystemOracle::with_override(config.manufacturer.clone());
    barcode_scanner_with(Arc::new(oracle), config)
}

/// Barcode scanner keyed by a caller-supplied oracle
pub fn barcode_scanner_with(
    oracle: Arc<dyn ManufacturerOracle>,
    config: &ScannerConfig,
) -> ScannerRouter {
    Router::new(key_provider(oracle), scanner_registry(config)).with_on_missing(no_integration)
}
