//! Device manufacturer detection command

use anyhow::Result;
use pera_platform::{ManufacturerOracle, SystemOracle};
use pera_router::ManufacturerKey;
use pera_scanner::{ConfigLoader, scanner_registry};

pub fn run() -> Result<()> {
    let config = ConfigLoader::load()?;
    let oracle = SystemOracle::with_override(config.manufacturer.clone());

    let raw = match oracle.current_manufacturer() {
        Ok(raw) => raw,
        Err(e) => {
            println!("Detection failed: {}", e);
            String::new()
        }
    };
    let key = ManufacturerKey::normalize(&raw);
    let registered = scanner_registry(&config).contains(&key);

    println!("Manufacturer: {}", if raw.is_empty() { "-" } else { raw.as_str() });
    println!("Key:          {}", key);
    println!(
        "Provider:     {}",
        if registered { "registered" } else { "none" }
    );
    Ok(())
}
