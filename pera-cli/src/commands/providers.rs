//! Provider listing

use anyhow::Result;
use pera_router::ManufacturerKey;
use pera_scanner::{ConfigLoader, DylibLoader, ScannerConfig, scanner_registry};

pub fn run() -> Result<()> {
    let config = ConfigLoader::load()?;
    for line in provider_lines(&config) {
        println!("{}", line);
    }
    Ok(())
}

/// One line per registered manufacturer: status, key, package and library
fn provider_lines(config: &ScannerConfig) -> Vec<String> {
    let registry = scanner_registry(config);
    registry.keys().map(|key| describe(config, key)).collect()
}

fn describe(config: &ScannerConfig, key: &ManufacturerKey) -> String {
    let Some(entry) = config.providers.get(key) else {
        return format!("✓ {:<12} built-in", key);
    };

    match DylibLoader::new(entry, &config.scanner_dir).find_library() {
        Ok(path) => format!("✓ {:<12} {}    {}", key, entry.package, path.display()),
        Err(e) => format!("✗ {:<12} {}    {}", key, entry.package, e),
    }
}
