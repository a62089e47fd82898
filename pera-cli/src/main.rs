use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pera", about = "Barcode scanner routing for pera devices")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage configuration
    Config(commands::config::ConfigArgs),
    /// Show the detected device manufacturer
    Manufacturer,
    /// List scanner providers by manufacturer
    Providers,
    /// Show the scanner provider for this device
    Info,
    /// Read a single barcode
    Scan(commands::scanner::ScanArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Config(args) => commands::config::run(args),
        Commands::Manufacturer => commands::manufacturer::run(),
        Commands::Providers => commands::providers::run(),
        Commands::Info => commands::scanner::info(),
        Commands::Scan(args) => commands::scanner::scan(args),
    }
}
