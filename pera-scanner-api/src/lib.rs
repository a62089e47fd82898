//! pera-scanner-api - Barcode scanner capability for pera
//!
//! Every vendor integration implements [`BarcodeScanner`]. Application code
//! never names a vendor: it holds a [`ScannerRouter`], which implements the
//! same trait and forwards to whichever provider the device manufacturer
//! selects on first use.
//!
//! Vendor integrations that ship as separate dynamic libraries export
//! themselves with [`export_scanner!`].
//!
//! # Example
//!
//! ```ignore
//! use pera_scanner_api::{
//!     Barcode, BarcodeScanner, Result, ScanOptions, ScannerInfo, Symbology, export_scanner,
//! };
//!
//! #[derive(Default)]
//! pub struct PaxScanner;
//!
//! impl BarcodeScanner for PaxScanner {
//!     fn info(&self) -> Result<ScannerInfo> {
//!         Ok(ScannerInfo {
//!             name: "pax-a920".to_string(),
//!             vendor: "PAX".to_string(),
//!             package: "diva.pax-a920-barcode-scanner".to_string(),
//!             version: "1.0.0".to_string(),
//!             ..Default::default()
//!         })
//!     }
//!
//!     fn open(&self) -> Result<()> { Ok(()) }
//!     fn close(&self) -> Result<()> { Ok(()) }
//!     fn is_open(&self) -> Result<bool> { Ok(true) }
//!
//!     fn scan(&self, _options: &ScanOptions) -> Result<Barcode> {
//!         Ok(Barcode::new("4006381333931", Symbology::Ean13))
//!     }
//! }
//!
//! export_scanner!(PaxScanner);
//! ```

pub mod error;
pub mod types;

use std::collections::BTreeMap;

use pera_router::{Introspect, MemberDescriptor, Router};

pub use error::{Result, ScannerError};
pub use types::*;

/// Current scanner API version. Dynamically loaded providers must match this
/// exactly.
pub const SCANNER_API_VERSION: u32 = 1;

/// Router whose providers are barcode scanners
pub type ScannerRouter = Router<dyn BarcodeScanner>;

/// The barcode scanner capability every vendor provider satisfies.
///
/// Every operation is fallible: when called through a [`ScannerRouter`], a
/// failure to resolve the provider is reported by whichever call triggered
/// resolution.
pub trait BarcodeScanner: Send + Sync {
    /// Provider metadata
    fn info(&self) -> Result<ScannerInfo>;

    /// Power up and claim the scan engine
    fn open(&self) -> Result<()>;

    /// Release the scan engine
    fn close(&self) -> Result<()>;

    fn is_open(&self) -> Result<bool>;

    /// Block until a barcode is decoded or the timeout elapses
    fn scan(&self, options: &ScanOptions) -> Result<Barcode>;

    /// Restrict the symbologies the engine decodes
    fn set_symbologies(&self, _symbologies: &[Symbology]) -> Result<()> {
        Err(ScannerError::unsupported("set_symbologies"))
    }

    /// Provider-defined data members (firmware, serial number, ...)
    fn properties(&self) -> Result<BTreeMap<String, String>> {
        Ok(BTreeMap::new())
    }
}

/// Operations of [`BarcodeScanner`], as exposed to introspection
const SCANNER_METHODS: &[&str] = &[
    "info",
    "open",
    "close",
    "is_open",
    "scan",
    "set_symbologies",
    "properties",
];

/// Fields of [`ScannerInfo`], as exposed to introspection
const INFO_PROPERTIES: &[&str] = &["name", "vendor", "package", "version", "api_version"];

impl Introspect for dyn BarcodeScanner {
    fn members(&self) -> Vec<MemberDescriptor> {
        let mut members: Vec<MemberDescriptor> = SCANNER_METHODS
            .iter()
            .map(|name| MemberDescriptor::method(*name))
            .collect();
        members.extend(INFO_PROPERTIES.iter().map(|name| MemberDescriptor::property(*name)));

        match self.properties() {
            Ok(properties) => members.extend(
                properties
                    .into_keys()
                    .filter(|name| !INFO_PROPERTIES.contains(&name.as_str()))
                    .map(MemberDescriptor::property),
            ),
            Err(e) => {
                tracing::debug!(error = %e, "Scanner properties unavailable");
            }
        }

        members
    }
}

impl BarcodeScanner for ScannerRouter {
    fn info(&self) -> Result<ScannerInfo> {
        self.provider()?.info()
    }

    fn open(&self) -> Result<()> {
        self.provider()?.open()
    }

    fn close(&self) -> Result<()> {
        self.provider()?.close()
    }

    fn is_open(&self) -> Result<bool> {
        self.provider()?.is_open()
    }

    fn scan(&self, options: &ScanOptions) -> Result<Barcode> {
        self.provider()?.scan(options)
    }

    fn set_symbologies(&self, symbologies: &[Symbology]) -> Result<()> {
        self.provider()?.set_symbologies(symbologies)
    }

    fn properties(&self) -> Result<BTreeMap<String, String>> {
        self.provider()?.properties()
    }
}

/// Export a scanner type for dynamic loading.
///
/// The type must implement [`BarcodeScanner`] and [`Default`].
///
/// # Generated Functions
///
/// - `_pera_scanner_create()`: Creates a new scanner instance
/// - `_pera_scanner_api_version()`: Returns the API version
/// - `_pera_scanner_destroy()`: Destroys a scanner instance
#[macro_export]
macro_rules! export_scanner {
    ($scanner_type:ty) => {
        #[unsafe(no_mangle)]
        #[allow(improper_ctypes_definitions)]
        pub extern "C" fn _pera_scanner_create() -> *mut dyn $crate::BarcodeScanner {
            let scanner: Box<dyn $crate::BarcodeScanner> = Box::new(<$scanner_type>::default());
            Box::into_raw(scanner)
        }

        #[unsafe(no_mangle)]
        pub extern "C" fn _pera_scanner_api_version() -> u32 {
            $crate::SCANNER_API_VERSION
        }

        #[unsafe(no_mangle)]
        #[allow(improper_ctypes_definitions)]
        pub extern "C" fn _pera_scanner_destroy(ptr: *mut dyn $crate::BarcodeScanner) {
            if !ptr.is_null() {
                unsafe {
                    drop(Box::from_raw(ptr));
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use pera_router::{LoadError, ProviderRegistry, RouterError};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct DeskScanner {
        open: AtomicBool,
    }

    impl BarcodeScanner for DeskScanner {
        fn info(&self) -> Result<ScannerInfo> {
            Ok(ScannerInfo {
                name: "desk".to_string(),
                vendor: "TEST".to_string(),
                package: "test.desk-scanner".to_string(),
                version: "0.1.0".to_string(),
                api_version: SCANNER_API_VERSION,
            })
        }

        fn open(&self) -> Result<()> {
            self.open.store(true, Ordering::SeqCst);
            Ok(())
        }

        fn close(&self) -> Result<()> {
            self.open.store(false, Ordering::SeqCst);
            Ok(())
        }

        fn is_open(&self) -> Result<bool> {
            Ok(self.open.load(Ordering::SeqCst))
        }

        fn scan(&self, _options: &ScanOptions) -> Result<Barcode> {
            if !self.is_open()? {
                return Err(ScannerError::NotOpen);
            }
            Ok(Barcode::new("hello", Symbology::QrCode))
        }

        fn properties(&self) -> Result<BTreeMap<String, String>> {
            Ok(BTreeMap::from([(
                "firmware".to_string(),
                "2.4.1".to_string(),
            )]))
        }
    }

    fn desk_router(manufacturer: &'static str) -> ScannerRouter {
        let registry: ProviderRegistry<dyn BarcodeScanner> = ProviderRegistry::new()
            .with("TEST", || Ok(Arc::new(DeskScanner::default()) as Arc<dyn BarcodeScanner>));
        Router::new(move || manufacturer.to_string(), registry)
    }

    #[test]
    fn test_api_version_is_set() {
        assert_eq!(SCANNER_API_VERSION, 1);
    }

    #[test]
    fn test_scanner_trait_is_object_safe() {
        fn _takes_boxed_scanner(_: Box<dyn BarcodeScanner>) {}
    }

    #[test]
    fn test_default_set_symbologies_is_unsupported() {
        let scanner = DeskScanner::default();
        let err = scanner.set_symbologies(&[Symbology::QrCode]).unwrap_err();
        assert!(matches!(err, ScannerError::Unsupported(_)));
    }

    #[test]
    fn test_router_forwards_state_to_one_instance() {
        let router = desk_router("test");

        assert!(matches!(
            router.scan(&ScanOptions::default()),
            Err(ScannerError::NotOpen)
        ));

        router.open().unwrap();
        assert!(router.is_open().unwrap());
        let barcode = router.scan(&ScanOptions::default()).unwrap();
        assert_eq!(barcode.text, "hello");

        router.close().unwrap();
        assert!(!router.is_open().unwrap());
        assert_eq!(router.info().unwrap().name, "desk");
    }

    #[test]
    fn test_router_surfaces_resolution_errors() {
        let router = desk_router("acme");

        let err = router.open().unwrap_err();
        match err {
            ScannerError::Router(RouterError::UnknownManufacturer { key }) => {
                assert_eq!(key.as_str(), "ACME");
            }
            other => panic!("expected router error, got {:?}", other),
        }
    }

    #[test]
    fn test_router_surfaces_loader_failure() {
        let registry: ProviderRegistry<dyn BarcodeScanner> = ProviderRegistry::new()
            .with("PAX", || Err(LoadError::not_installed("diva.pax-a920-barcode-scanner")));
        let router = Router::new(|| "pax".to_string(), registry);

        let err = router.info().unwrap_err();
        assert!(err.to_string().contains("diva.pax-a920-barcode-scanner"));
    }

    struct FaultyScanner;

    impl BarcodeScanner for FaultyScanner {
        fn info(&self) -> Result<ScannerInfo> {
            Err(ScannerError::device("bus fault"))
        }

        fn open(&self) -> Result<()> {
            Err(ScannerError::device("bus fault"))
        }

        fn close(&self) -> Result<()> {
            Ok(())
        }

        fn is_open(&self) -> Result<bool> {
            Ok(false)
        }

        fn scan(&self, _options: &ScanOptions) -> Result<Barcode> {
            Err(ScannerError::NotOpen)
        }

        fn properties(&self) -> Result<BTreeMap<String, String>> {
            Err(ScannerError::device("bus fault"))
        }
    }

    #[test]
    fn test_introspection_survives_failing_properties() {
        let scanner: &dyn BarcodeScanner = &FaultyScanner;
        let names = scanner.member_names();

        assert_eq!(names.len(), SCANNER_METHODS.len() + INFO_PROPERTIES.len());
        assert!(scanner.has_member("scan"));
        assert!(scanner.has_member("vendor"));
        assert!(!scanner.has_member("firmware"));
    }

    #[test]
    fn test_introspection_lists_methods_and_properties() {
        let router = desk_router("test");

        let keys = router.keys().unwrap();
        assert!(keys.contains(&"scan".to_string()));
        assert!(keys.contains(&"vendor".to_string()));
        assert!(keys.contains(&"firmware".to_string()));

        assert!(router.has("open").unwrap());
        assert!(!router.has("beep").unwrap());

        let desc = router.descriptor("firmware").unwrap().unwrap();
        assert_eq!(desc.kind, pera_router::MemberKind::Property);
        assert!(desc.configurable);
    }
}
