mod commands;
mod summary;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use idframe_core::config::WizardConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "idframe", about = "Crop ID photos and clean up signatures")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Wizard config file (TOML); defaults are used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show image metadata and how it fits each slot
    Info(commands::info::InfoArgs),
    /// Crop one or more images for a slot
    Crop(commands::crop::CropArgs),
    /// Crop a signature and remove its paper background
    Signature(commands::signature::SignatureArgs),
    /// Print or save the effective config
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = load_config(cli.config.as_deref())?;

    match &cli.command {
        Commands::Info(args) => commands::info::run(args, &config),
        Commands::Crop(args) => commands::crop::run(args, &config),
        Commands::Signature(args) => commands::signature::run(args, &config),
        Commands::Config(args) => commands::config::run(args, &config),
    }
}

fn load_config(path: Option<&Path>) -> Result<WizardConfig> {
    match path {
        Some(path) => WizardConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(WizardConfig::default()),
    }
}
