//! pera-platform - Device manufacturer detection
//!
//! The router only needs a `Fn() -> String` that names the current device
//! manufacturer. This crate provides that function on top of a small
//! [`ManufacturerOracle`] trait with several detection backends:
//!
//! - [`EnvOracle`]: explicit override through `PERA_MANUFACTURER`
//! - [`AndroidPropOracle`]: `getprop ro.product.manufacturer`
//! - [`DmiOracle`]: Linux DMI vendor string
//! - [`FixedOracle`]: a configured value
//! - [`ChainOracle`]: first backend with an answer wins
//!
//! Oracle failures never reach application code: [`current_manufacturer`]
//! logs them and reports the empty (unknown) manufacturer instead.

pub mod error;
pub mod oracle;

pub use error::{OracleError, Result};
pub use oracle::{
    AndroidPropOracle, ChainOracle, DmiOracle, EnvOracle, FixedOracle, MANUFACTURER_ENV,
    ManufacturerOracle, SystemOracle, current_manufacturer, key_provider,
};
