use anyhow::Result;
use clap::{Args, Subcommand};
use pera_scanner::{ConfigLoader, ScannerConfig};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (merged)
    Show,
    /// Show configuration file paths
    Path,
}

pub fn run(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(),
        ConfigCommands::Path => show_paths(),
    }
}

fn show_config() -> Result<()> {
    let config = ConfigLoader::load()?;
    print!("{}", render(&config));
    Ok(())
}

fn show_paths() -> Result<()> {
    println!("User config:    {:?}", ConfigLoader::user_config_path());
    println!("Project config: {:?}", ConfigLoader::project_config_path());
    println!("Scanner dir:    {:?}", pera_paths::scanner_dir());
    Ok(())
}

fn render(config: &ScannerConfig) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Manufacturer: {}\n",
        config.manufacturer.as_deref().unwrap_or("(detected)")
    ));
    out.push_str(&format!("Scanner dir:  {}\n", config.scanner_dir.display()));
    out.push_str("Providers:\n");
    for (key, entry) in &config.providers {
        out.push_str(&format!("  {:<12} {}", key, entry.package));
        if let Some(library) = &entry.library {
            out.push_str(&format!(" ({})", library.display()));
        }
        out.push('\n');
    }
    out
}
