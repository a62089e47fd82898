//! Simulated barcode scanner
//!
//! Serves a queue of canned barcodes, so apps and tests can exercise the
//! full scanner flow on machines with no scanning hardware. The queue is
//! seeded from `PERA_SIM_BARCODES` as comma-separated `symbology:text`
//! pairs. Items without a known symbology prefix are read whole as QR codes.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use pera_scanner_api::{
    Barcode, BarcodeScanner, Result, SCANNER_API_VERSION, ScanOptions, ScannerError, ScannerInfo,
    Symbology, export_scanner,
};

/// Environment variable holding the barcodes to serve
pub const SIM_BARCODES_ENV: &str = "PERA_SIM_BARCODES";

/// Firmware string reported in properties
const FIRMWARE: &str = "sim-1.0";

pub struct SimScanner {
    queue: Mutex<VecDeque<Barcode>>,
    enabled: Mutex<Vec<Symbology>>,
    open: AtomicBool,
}

impl SimScanner {
    /// Scanner serving `barcodes` in order
    pub fn with_barcodes(barcodes: impl IntoIterator<Item = Barcode>) -> Self {
        Self {
            queue: Mutex::new(barcodes.into_iter().collect()),
            enabled: Mutex::new(Vec::new()),
            open: AtomicBool::new(false),
        }
    }

    /// Queue another barcode behind those already waiting
    pub fn push(&self, barcode: Barcode) {
        self.lock_queue().push_back(barcode);
    }

    /// Barcodes not yet served
    pub fn pending(&self) -> usize {
        self.lock_queue().len()
    }

    fn lock_queue(&self) -> std::sync::MutexGuard<'_, VecDeque<Barcode>> {
        self.queue
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn enabled(&self) -> Vec<Symbology> {
        self.enabled
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl Default for SimScanner {
    fn default() -> Self {
        let barcodes = std::env::var(SIM_BARCODES_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(|v| parse_barcodes(&v))
            .unwrap_or_else(default_barcodes);
        Self::with_barcodes(barcodes)
    }
}

/// Parse `symbology:text` pairs separated by commas
pub fn parse_barcodes(spec: &str) -> Vec<Barcode> {
    spec.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| match known_symbology_prefix(item) {
            Some((symbology, text)) => Barcode::new(text.trim(), symbology),
            None => Barcode::new(item, Symbology::QrCode),
        })
        .collect()
}

/// Split `symbology:text` when the prefix names a known symbology.
///
/// Anything else (`https://...`, `urn:isbn:...`) is QR text as a whole.
fn known_symbology_prefix(item: &str) -> Option<(Symbology, &str)> {
    let (prefix, text) = item.split_once(':')?;
    match prefix.parse::<Symbology>().ok()? {
        Symbology::Other(_) => None,
        symbology => Some((symbology, text)),
    }
}

fn default_barcodes() -> Vec<Barcode> {
    vec![
        Barcode::new("4006381333931", Symbology::Ean13),
        Barcode::new("https://pera.example/receipt/1", Symbology::QrCode),
        Barcode::new("PERA-0001", Symbology::Code128),
    ]
}

impl BarcodeScanner for SimScanner {
    fn info(&self) -> Result<ScannerInfo> {
        Ok(ScannerInfo {
            name: "sim".to_string(),
            vendor: "SIMULATOR".to_string(),
            package: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            api_version: SCANNER_API_VERSION,
        })
    }

    fn open(&self) -> Result<()> {
        if !self.open.swap(true, Ordering::SeqCst) {
            tracing::debug!(pending = self.pending(), "Simulated scanner opened");
        }
        Ok(())
    }

    fn close(&self) -> Result<()> {
        self.open.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_open(&self) -> Result<bool> {
        Ok(self.open.load(Ordering::SeqCst))
    }

    fn scan(&self, options: &ScanOptions) -> Result<Barcode> {
        if !self.open.load(Ordering::SeqCst) {
            return Err(ScannerError::NotOpen);
        }

        let enabled = self.enabled();
        let mut queue = self.lock_queue();
        let position = queue.iter().position(|barcode| {
            options.accepts(&barcode.symbology)
                && (enabled.is_empty() || enabled.contains(&barcode.symbology))
        });

        match position.and_then(|i| queue.remove(i)) {
            Some(barcode) => Ok(barcode),
            None => Err(ScannerError::Timeout(options.timeout)),
        }
    }

    fn set_symbologies(&self, symbologies: &[Symbology]) -> Result<()> {
        *self
            .enabled
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = symbologies.to_vec();
        Ok(())
    }

    fn properties(&self) -> Result<BTreeMap<String, String>> {
        Ok(BTreeMap::from([
            ("firmware".to_string(), FIRMWARE.to_string()),
            ("queued".to_string(), self.pending().to_string()),
        ]))
    }
}

export_scanner!(SimScanner);

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::time::Duration;

    fn opened(barcodes: Vec<Barcode>) -> SimScanner {
        let scanner = SimScanner::with_barcodes(barcodes);
        scanner.open().unwrap();
        scanner
    }

    #[test]
    fn test_parse_barcodes() {
        let parsed = parse_barcodes("ean13:4006381333931, plain ,code128:A-1,");
        assert_eq!(
            parsed,
            vec![
                Barcode::new("4006381333931", Symbology::Ean13),
                Barcode::new("plain", Symbology::QrCode),
                Barcode::new("A-1", Symbology::Code128),
            ]
        );
    }

    #[test]
    fn test_parse_keeps_colons_in_bare_text() {
        let parsed = parse_barcodes("https://pera.example/receipt/1, urn:isbn:0451450523");
        assert_eq!(
            parsed,
            vec![
                Barcode::new("https://pera.example/receipt/1", Symbology::QrCode),
                Barcode::new("urn:isbn:0451450523", Symbology::QrCode),
            ]
        );
    }

    #[test]
    fn test_parse_known_prefix_keeps_rest_of_text() {
        let parsed = parse_barcodes("qr:https://pera.example/a");
        assert_eq!(
            parsed,
            vec![Barcode::new("https://pera.example/a", Symbology::QrCode)]
        );
    }

    #[test]
    #[serial]
    fn test_default_reads_env() {
        unsafe { std::env::set_var(SIM_BARCODES_ENV, "qr:hello") };
        let scanner = SimScanner::default();
        unsafe { std::env::remove_var(SIM_BARCODES_ENV) };

        assert_eq!(scanner.pending(), 1);
    }

    #[test]
    #[serial]
    fn test_default_without_env_has_samples() {
        unsafe { std::env::remove_var(SIM_BARCODES_ENV) };
        assert_eq!(SimScanner::default().pending(), default_barcodes().len());
    }

    #[test]
    fn test_scan_requires_open() {
        let scanner = SimScanner::with_barcodes(default_barcodes());
        let err = scanner.scan(&ScanOptions::default()).unwrap_err();
        assert!(matches!(err, ScannerError::NotOpen));
    }

    #[test]
    fn test_scan_serves_in_order() {
        let scanner = opened(default_barcodes());
        let first = scanner.scan(&ScanOptions::default()).unwrap();
        assert_eq!(first.symbology, Symbology::Ean13);
        assert_eq!(scanner.pending(), 2);
    }

    #[test]
    fn test_scan_empty_queue_times_out() {
        let scanner = opened(vec![]);
        let timeout = Duration::from_millis(50);
        let err = scanner
            .scan(&ScanOptions::default().with_timeout(timeout))
            .unwrap_err();
        assert!(matches!(err, ScannerError::Timeout(t) if t == timeout));
    }

    #[test]
    fn test_scan_skips_filtered_symbologies() {
        let scanner = opened(default_barcodes());
        let options = ScanOptions::default().with_symbologies(vec![Symbology::Code128]);

        let barcode = scanner.scan(&options).unwrap();
        assert_eq!(barcode.text, "PERA-0001");
        assert!(scanner.scan(&options).is_err());
        assert_eq!(scanner.pending(), 2);
    }

    #[test]
    fn test_set_symbologies_limits_scans() {
        let scanner = opened(default_barcodes());
        scanner.set_symbologies(&[Symbology::QrCode]).unwrap();

        let barcode = scanner.scan(&ScanOptions::default()).unwrap();
        assert_eq!(barcode.symbology, Symbology::QrCode);
    }

    #[test]
    fn test_close_then_scan_fails() {
        let scanner = opened(default_barcodes());
        scanner.close().unwrap();
        assert!(!scanner.is_open().unwrap());
        assert!(scanner.scan(&ScanOptions::default()).is_err());
    }

    #[test]
    fn test_properties_report_queue() {
        let scanner = opened(vec![]);
        scanner.push(Barcode::new("x", Symbology::Code39));
        let props = scanner.properties().unwrap();
        assert_eq!(props["queued"], "1");
        assert_eq!(props["firmware"], FIRMWARE);
    }

    #[test]
    fn test_info_names_simulator() {
        let info = SimScanner::with_barcodes(vec![]).info().unwrap();
        assert_eq!(info.vendor, "SIMULATOR");
        assert_eq!(info.package, "pera-sim-scanner");
        assert_eq!(info.api_version, SCANNER_API_VERSION);
    }
}
