//! Commands that resolve and use the device scanner

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use pera_scanner::{BarcodeScanner, ConfigLoader, ScanOptions, Symbology, barcode_scanner};

#[derive(Args)]
pub struct ScanArgs {
    /// Seconds to wait for a barcode
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Only accept these symbologies (e.g. qr_code, ean13)
    #[arg(long = "symbology", value_name = "NAME")]
    pub symbologies: Vec<String>,
}

impl ScanArgs {
    fn options(&self) -> ScanOptions {
        let symbologies = self
            .symbologies
            .iter()
            .filter_map(|s| s.parse::<Symbology>().ok())
            .collect();
        ScanOptions::default()
            .with_timeout(Duration::from_secs(self.timeout))
            .with_symbologies(symbologies)
    }
}

pub fn info() -> Result<()> {
    let config = ConfigLoader::load()?;
    let scanner = barcode_scanner(&config);

    let info = scanner.info()?;
    println!("Name:        {}", info.name);
    println!("Vendor:      {}", info.vendor);
    println!("Package:     {}", info.package);
    println!("Version:     {}", info.version);
    println!("API Version: {}", info.api_version);

    let properties = scanner.properties()?;
    if !properties.is_empty() {
        println!();
        println!("Properties:");
        for (name, value) in properties {
            println!("  {:<12} {}", name, value);
        }
    }

    println!();
    println!("Members: {}", scanner.keys()?.join(", "));
    Ok(())
}

pub fn scan(args: ScanArgs) -> Result<()> {
    let config = ConfigLoader::load()?;
    let scanner = barcode_scanner(&config);

    scanner.open().context("Failed to open scanner")?;
    let result = scanner.scan(&args.options());
    if let Err(e) = scanner.close() {
        tracing::warn!(error = %e, "Failed to close scanner");
    }

    let barcode = result?;
    println!("{}", serde_json::to_string_pretty(&barcode)?);
    Ok(())
}
