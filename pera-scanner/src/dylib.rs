//! Vendor scanner libraries loaded at runtime
//!
//! A vendor integration ships as a dynamic library built with
//! [`pera_scanner_api::export_scanner!`]. Libraries live either at an explicit
//! path from the config or under `<scanner_dir>/<package>/`:
//!
//! - `<package>.so` (or `.dylib`/`.dll`)
//! - `lib<package>.so`, with `.` and `-` in the package mapped to `_`

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use libloading::Library;
use pera_router::LoadError;
use pera_scanner_api::{
    Barcode, BarcodeScanner, Result, SCANNER_API_VERSION, ScanOptions, ScannerInfo, Symbology,
};

use crate::config::ProviderEntry;
use crate::error::DylibError;

/// A scanner instance together with the library its code lives in
pub struct LoadedScanner {
    /// Declared before `_library` so it is dropped first
    instance: Box<dyn BarcodeScanner>,
    path: PathBuf,
    /// Keep the library loaded
    _library: Library,
}

impl LoadedScanner {
    /// Path of the library backing this scanner
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LoadedScanner {
    fn drop(&mut self) {
        // Release the scan engine before the library goes away
        if matches!(self.instance.is_open(), Ok(true))
            && let Err(e) = self.instance.close()
        {
            tracing::warn!(
                library = %self.path.display(),
                error = %e,
                "Scanner close on unload returned error"
            );
        }
    }
}

impl BarcodeScanner for LoadedScanner {
    fn info(&self) -> Result<ScannerInfo> {
        self.instance.info()
    }

    fn open(&self) -> Result<()> {
        self.instance.open()
    }

    fn close(&self) -> Result<()> {
        self.instance.close()
    }

    fn is_open(&self) -> Result<bool> {
        self.instance.is_open()
    }

    fn scan(&self, options: &ScanOptions) -> Result<Barcode> {
        self.instance.scan(options)
    }

    fn set_symbologies(&self, symbologies: &[Symbology]) -> Result<()> {
        self.instance.set_symbologies(symbologies)
    }

    fn properties(&self) -> Result<BTreeMap<String, String>> {
        self.instance.properties()
    }
}

/// Loads one vendor package's scanner library
#[derive(Debug, Clone)]
pub struct DylibLoader {
    package: String,
    library: Option<PathBuf>,
    search_dir: PathBuf,
}

impl DylibLoader {
    pub fn new(entry: &ProviderEntry, scanner_dir: &Path) -> Self {
        Self {
            package: entry.package.clone(),
            library: entry.library.clone(),
            search_dir: scanner_dir.join(&entry.package),
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    /// Locate the library file without loading it
    pub fn find_library(&self) -> std::result::Result<PathBuf, DylibError> {
        if let Some(path) = &self.library {
            return if path.exists() {
                Ok(path.clone())
            } else {
                Err(DylibError::MissingPath { path: path.clone() })
            };
        }

        let extensions = if cfg!(target_os = "macos") {
            vec!["dylib", "so"]
        } else if cfg!(target_os = "windows") {
            vec!["dll"]
        } else {
            vec!["so"]
        };
        let crate_name = self.package.replace(['.', '-'], "_");

        for ext in extensions {
            let candidates = [
                format!("{}.{}", self.package, ext),
                format!("lib{}.{}", crate_name, ext),
                format!("{}.{}", crate_name, ext),
            ];
            for candidate in candidates {
                let lib_path = self.search_dir.join(candidate);
                if lib_path.exists() {
                    return Ok(lib_path);
                }
            }
        }

        Err(DylibError::LibraryNotFound {
            dir: self.search_dir.clone(),
        })
    }

    /// Load the library and create its scanner
    pub fn load(&self) -> std::result::Result<LoadedScanner, DylibError> {
        let lib_path = self.find_library()?;
        tracing::debug!(
            package = %self.package,
            library = %lib_path.display(),
            "Loading scanner library"
        );

        // SAFETY: The library is a vendor package the application was
        // configured with and is expected to follow the export_scanner! ABI.
        let library = unsafe { Library::new(&lib_path)? };

        // SAFETY: Calling a C function exported by export_scanner!.
        let api_version_fn: libloading::Symbol<extern "C" fn() -> u32> =
            unsafe { library.get(b"_pera_scanner_api_version")? };

        check_api_version(api_version_fn())?;

        // SAFETY: The create function returns a pointer from Box::into_raw
        // that we convert back to a Box<dyn BarcodeScanner>.
        let create_fn: libloading::Symbol<extern "C" fn() -> *mut dyn BarcodeScanner> =
            unsafe { library.get(b"_pera_scanner_create")? };

        let instance = unsafe { Box::from_raw(create_fn()) };

        Ok(LoadedScanner {
            instance,
            path: lib_path,
            _library: library,
        })
    }

    /// Load as a provider, mapping failures to actionable [`LoadError`]s.
    ///
    /// `manufacturer` only feeds the install hint for a missing package.
    pub fn load_provider(
        &self,
        manufacturer: &str,
    ) -> std::result::Result<Arc<dyn BarcodeScanner>, LoadError> {
        match self.load() {
            Ok(scanner) => {
                tracing::info!(
                    package = %self.package,
                    library = %scanner.path().display(),
                    "Scanner library loaded"
                );
                Ok(Arc::new(scanner))
            }
            Err(e) if e.is_not_installed() => {
                tracing::warn!(package = %self.package, error = %e, "Scanner module load failed");
                Err(LoadError::new(
                    &self.package,
                    install_hint(manufacturer, &self.package),
                ))
            }
            Err(e) => {
                tracing::warn!(package = %self.package, error = %e, "Scanner module load failed");
                Err(LoadError::new(&self.package, e.to_string()))
            }
        }
    }
}

/// Reject libraries built against a different scanner API
fn check_api_version(found: u32) -> std::result::Result<(), DylibError> {
    if found != SCANNER_API_VERSION {
        return Err(DylibError::ApiVersionMismatch {
            expected: SCANNER_API_VERSION,
            found,
        });
    }
    Ok(())
}

/// Message telling the integrator which package to add
pub fn install_hint(manufacturer: &str, package: &str) -> String {
    format!(
        "{} scanner module is not installed. Please add '{}' to your app.",
        manufacturer.trim().to_uppercase(),
        package
    )
}
