//! Manufacturer oracle trait and detection backends

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::{OracleError, Result};

/// Environment variable consulted by [`EnvOracle`] by default
pub const MANUFACTURER_ENV: &str = "PERA_MANUFACTURER";

/// Android system property holding the device manufacturer
const MANUFACTURER_PROP: &str = "ro.product.manufacturer";

/// Linux DMI vendor file
const DMI_VENDOR_PATH: &str = "/sys/class/dmi/id/sys_vendor";

/// Something that can name the current device manufacturer
pub trait ManufacturerOracle: Send + Sync {
    /// Short identifier used in diagnostics
    fn name(&self) -> &str;

    /// Raw manufacturer string, not yet normalized
    fn current_manufacturer(&self) -> Result<String>;
}

/// Ask `oracle` for the manufacturer, absorbing any failure.
///
/// Errors are logged at warn level and reported as the empty string, which
/// the router treats as an unknown manufacturer.
pub fn current_manufacturer(oracle: &dyn ManufacturerOracle) -> String {
    match oracle.current_manufacturer() {
        Ok(manufacturer) => manufacturer.trim().to_string(),
        Err(e) => {
            tracing::warn!(oracle = oracle.name(), error = %e, "Manufacturer lookup failed");
            String::new()
        }
    }
}

/// Wrap an oracle as a router key provider
pub fn key_provider(
    oracle: Arc<dyn ManufacturerOracle>,
) -> impl Fn() -> String + Send + Sync + 'static {
    move || current_manufacturer(oracle.as_ref())
}

/// Always reports the same manufacturer
#[derive(Debug, Clone)]
pub struct FixedOracle(pub String);

impl FixedOracle {
    pub fn new(manufacturer: impl Into<String>) -> Self {
        Self(manufacturer.into())
    }
}

impl ManufacturerOracle for FixedOracle {
    fn name(&self) -> &str {
        "fixed"
    }

    fn current_manufacturer(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Reads the manufacturer from an environment variable
#[derive(Debug, Clone)]
pub struct EnvOracle {
    var: String,
}

impl EnvOracle {
    pub fn new() -> Self {
        Self::with_var(MANUFACTURER_ENV)
    }

    pub fn with_var(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl ManufacturerOracle for EnvOracle {
    fn name(&self) -> &str {
        "env"
    }

    fn current_manufacturer(&self) -> Result<String> {
        std::env::var(&self.var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| OracleError::NotSet {
                var: self.var.clone(),
            })
    }
}

/// Queries an Android system property through `getprop`
#[derive(Debug, Clone)]
pub struct AndroidPropOracle {
    property: String,
}

impl AndroidPropOracle {
    pub fn new() -> Self {
        Self::with_property(MANUFACTURER_PROP)
    }

    pub fn with_property(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
        }
    }
}

impl Default for AndroidPropOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl ManufacturerOracle for AndroidPropOracle {
    fn name(&self) -> &str {
        "android-prop"
    }

    #[cfg(unix)]
    fn current_manufacturer(&self) -> Result<String> {
        let getprop = which::which("getprop").map_err(|_| OracleError::ToolNotFound {
            tool: "getprop".to_string(),
        })?;

        let output = std::process::Command::new(getprop).arg(&self.property).output()?;
        if !output.status.success() {
            return Err(OracleError::CommandFailed {
                command: format!("getprop {}", self.property),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    #[cfg(not(unix))]
    fn current_manufacturer(&self) -> Result<String> {
        Err(OracleError::Unsupported {
            oracle: self.name().to_string(),
        })
    }
}

/// Reads the system vendor exposed by the Linux DMI interface
#[derive(Debug, Clone)]
pub struct DmiOracle {
    path: Option<PathBuf>,
}

impl DmiOracle {
    pub fn new() -> Self {
        let path = cfg!(target_os = "linux").then(|| PathBuf::from(DMI_VENDOR_PATH));
        Self { path }
    }

    /// Read the vendor from a specific file
    pub fn at(path: impl AsRef<Path>) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
        }
    }
}

impl Default for DmiOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl ManufacturerOracle for DmiOracle {
    fn name(&self) -> &str {
        "dmi"
    }

    fn current_manufacturer(&self) -> Result<String> {
        let Some(path) = &self.path else {
            return Err(OracleError::Unsupported {
                oracle: self.name().to_string(),
            });
        };

        std::fs::read_to_string(path)
            .map(|s| s.trim().to_string())
            .map_err(|source| OracleError::Read {
                path: path.clone(),
                source,
            })
    }
}

/// Tries each oracle in order; the first non-empty answer wins
#[derive(Default)]
pub struct ChainOracle {
    oracles: Vec<Box<dyn ManufacturerOracle>>,
}

impl ChainOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, oracle: impl ManufacturerOracle + 'static) -> Self {
        self.oracles.push(Box::new(oracle));
        self
    }

    pub fn len(&self) -> usize {
        self.oracles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.oracles.is_empty()
    }
}

impl ManufacturerOracle for ChainOracle {
    fn name(&self) -> &str {
        "chain"
    }

    fn current_manufacturer(&self) -> Result<String> {
        let mut last_error = None;

        for oracle in &self.oracles {
            match oracle.current_manufacturer() {
                Ok(manufacturer) if !manufacturer.trim().is_empty() => {
                    tracing::debug!(
                        oracle = oracle.name(),
                        manufacturer = %manufacturer.trim(),
                        "Manufacturer detected"
                    );
                    return Ok(manufacturer);
                }
                Ok(_) => {
                    tracing::debug!(oracle = oracle.name(), "Oracle returned empty manufacturer");
                }
                Err(e) => {
                    tracing::debug!(oracle = oracle.name(), error = %e, "Oracle failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(OracleError::Exhausted))
    }
}

/// Default detection order for a running device: env override, Android
/// system property, then Linux DMI.
pub struct SystemOracle(ChainOracle);

impl SystemOracle {
    pub fn new() -> Self {
        Self::with_override(None)
    }

    /// Put a configured manufacturer ahead of every detection backend
    pub fn with_override(manufacturer: Option<String>) -> Self {
        let mut chain = ChainOracle::new();
        if let Some(manufacturer) = manufacturer.filter(|m| !m.trim().is_empty()) {
            chain = chain.push(FixedOracle::new(manufacturer));
        }
        let chain = chain
            .push(EnvOracle::new())
            .push(AndroidPropOracle::new())
            .push(DmiOracle::new());
        Self(chain)
    }
}

impl Default for SystemOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl ManufacturerOracle for SystemOracle {
    fn name(&self) -> &str {
        "system"
    }

    fn current_manufacturer(&self) -> Result<String> {
        self.0.current_manufacturer()
    }
}
