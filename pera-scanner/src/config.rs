//! Scanner configuration - layered user and project TOML files
//!
//! ```toml
//! # Force a manufacturer instead of detecting it
//! manufacturer = "PAX"
//!
//! [providers.PAX]
//! package = "diva.pax-a920-barcode-scanner"
//! library = "/opt/pax/libdiva_pax_a920_barcode_scanner.so"
//!
//! [providers.SUNMI]
//! package = "sunmi-scanner"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use pera_router::ManufacturerKey;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::{PAX_MANUFACTURER, PAX_PACKAGE};

/// File name of the scanner config in each layer
pub const CONFIG_FILE: &str = "scanners.toml";

/// Env var overriding the project config directory
pub const PROJECT_CONFIG_ENV: &str = "PERA_PROJECT_CONFIG_DIR";

/// Where to find the vendor library for one manufacturer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEntry {
    /// Package identifier, also the library search directory name
    pub package: String,
    /// Explicit library path; searched for under the scanner dir when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library: Option<PathBuf>,
}

impl ProviderEntry {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            library: None,
        }
    }

    pub fn with_library(mut self, library: impl Into<PathBuf>) -> Self {
        self.library = Some(library.into());
        self
    }
}

/// Configuration as stored in TOML files (optional fields for merging)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawScannerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scanner_dir: Option<PathBuf>,

    #[serde(default)]
    pub providers: BTreeMap<ManufacturerKey, ProviderEntry>,
}

impl RawScannerConfig {
    /// Load a single layer. Returns `None` if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let raw = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Some(raw))
    }

    /// Save this layer, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent().filter(|p| !p.exists()) {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, PartialEq)]
pub struct ScannerConfig {
    /// Manufacturer override placed ahead of device detection
    pub manufacturer: Option<String>,
    /// Root searched for vendor libraries
    pub scanner_dir: PathBuf,
    /// Vendor libraries by manufacturer
    pub providers: BTreeMap<ManufacturerKey, ProviderEntry>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        ConfigLoader::finalize(RawScannerConfig::default())
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project)
    pub fn load() -> Result<ScannerConfig, ConfigError> {
        Self::load_layers(&[Self::user_config_path(), Self::project_config_path()])
    }

    /// Load and merge the given layers; later layers win
    pub fn load_layers(paths: &[PathBuf]) -> Result<ScannerConfig, ConfigError> {
        let mut raw = RawScannerConfig::default();

        for path in paths {
            if let Some(layer) = RawScannerConfig::load(path)? {
                tracing::debug!(path = %path.display(), "Loaded scanner config layer");
                raw = Self::merge_raw(raw, layer);
            }
        }

        Ok(Self::finalize(raw))
    }

    /// User config path (`$XDG_CONFIG_HOME/pera/scanners.toml`)
    pub fn user_config_path() -> PathBuf {
        pera_paths::config_dir().join(CONFIG_FILE)
    }

    /// Project config path
    /// Can be overridden with PERA_PROJECT_CONFIG_DIR (useful for isolated tests)
    pub fn project_config_path() -> PathBuf {
        if let Ok(dir) = std::env::var(PROJECT_CONFIG_ENV) {
            PathBuf::from(dir).join(CONFIG_FILE)
        } else {
            PathBuf::from(".pera").join(CONFIG_FILE)
        }
    }

    /// Merge two raw configs (overlay values override base only if set)
    fn merge_raw(base: RawScannerConfig, overlay: RawScannerConfig) -> RawScannerConfig {
        let mut providers = base.providers;
        providers.extend(overlay.providers);

        RawScannerConfig {
            manufacturer: overlay.manufacturer.or(base.manufacturer),
            scanner_dir: overlay.scanner_dir.or(base.scanner_dir),
            providers,
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawScannerConfig) -> ScannerConfig {
        let mut providers = BTreeMap::from([(
            ManufacturerKey::normalize(PAX_MANUFACTURER),
            ProviderEntry::new(PAX_PACKAGE),
        )]);
        providers.extend(raw.providers);

        ScannerConfig {
            manufacturer: raw.manufacturer.filter(|m| !m.trim().is_empty()),
            scanner_dir: raw.scanner_dir.unwrap_or_else(pera_paths::scanner_dir),
            providers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_default_has_pax_provider() {
        let config = ScannerConfig::default();
        let pax = config
            .providers
            .get(&ManufacturerKey::normalize("pax"))
            .unwrap();
        assert_eq!(pax.package, PAX_PACKAGE);
        assert!(pax.library.is_none());
        assert!(config.manufacturer.is_none());
    }

    #[test]
    fn test_raw_config_partial_parsing() {
        let raw: RawScannerConfig = toml::from_str(r#"manufacturer = "sunmi""#).unwrap();
        assert_eq!(raw.manufacturer.as_deref(), Some("sunmi"));
        assert!(raw.providers.is_empty());
        assert!(raw.scanner_dir.is_none());
    }

    #[test]
    fn test_provider_keys_are_normalized() {
        let raw: RawScannerConfig = toml::from_str(
            r#"
[providers." sunmi "]
package = "sunmi-scanner"
"#,
        )
        .unwrap();
        assert!(raw.providers.contains_key(&ManufacturerKey::normalize("SUNMI")));
    }

    #[test]
    fn test_load_missing_layer_is_none() {
        let loaded = RawScannerConfig::load(Path::new("/nonexistent/pera/scanners.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_invalid_toml_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "broken.toml", "providers = 3");
        let err = RawScannerConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_project_layer_overrides_user_layer() {
        let dir = TempDir::new().unwrap();
        let user = write(
            &dir,
            "user.toml",
            r#"
manufacturer = "pax"
scanner_dir = "/user/scanners"

[providers.PAX]
package = "diva.pax-a920-barcode-scanner"
library = "/user/libpax.so"

[providers.SUNMI]
package = "sunmi-scanner"
"#,
        );
        let project = write(
            &dir,
            "project.toml",
            r#"
manufacturer = "sunmi"

[providers.PAX]
package = "diva.pax-a920-barcode-scanner"
library = "/project/libpax.so"
"#,
        );

        let config = ConfigLoader::load_layers(&[user, project]).unwrap();

        assert_eq!(config.manufacturer.as_deref(), Some("sunmi"));
        assert_eq!(config.scanner_dir, PathBuf::from("/user/scanners"));

        let pax = &config.providers[&ManufacturerKey::normalize("PAX")];
        assert_eq!(pax.library, Some(PathBuf::from("/project/libpax.so")));
        assert!(config.providers.contains_key(&ManufacturerKey::normalize("SUNMI")));
    }

    #[test]
    fn test_blank_manufacturer_is_ignored() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "scanners.toml", r#"manufacturer = "  ""#);
        let config = ConfigLoader::load_layers(&[path]).unwrap();
        assert!(config.manufacturer.is_none());
    }

    #[test]
    fn test_save_creates_parent_dirs_and_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/pera/scanners.toml");

        let mut raw = RawScannerConfig::default();
        raw.providers.insert(
            ManufacturerKey::normalize("urovo"),
            ProviderEntry::new("urovo-scanner").with_library("/opt/urovo/liburovo.so"),
        );
        raw.save(&path).unwrap();

        let loaded = RawScannerConfig::load(&path).unwrap().unwrap();
        assert_eq!(loaded, raw);
    }

    #[test]
    #[serial]
    fn test_project_config_path_respects_env() {
        unsafe {
            std::env::set_var(PROJECT_CONFIG_ENV, "/tmp/pera-project");
        }
        assert_eq!(
            ConfigLoader::project_config_path(),
            PathBuf::from("/tmp/pera-project/scanners.toml")
        );
        unsafe {
            std::env::remove_var(PROJECT_CONFIG_ENV);
        }
        assert_eq!(
            ConfigLoader::project_config_path(),
            PathBuf::from(".pera/scanners.toml")
        );
    }
}
