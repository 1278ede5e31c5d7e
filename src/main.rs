use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use lakeddl::{run_generate, run_reconcile};

#[derive(Parser)]
#[command(name = "lakeddl")]
#[command(author, version, about = "External table and view script generator for lakehouse column catalogs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate external table and view scripts for the configured entities
    Generate {
        /// Path to the JSON run configuration
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Reconcile the catalogs and write the discrepancy report sheets
    Reconcile {
        /// Path to the JSON run configuration
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { config } => run_generate(&config)?,
        Commands::Reconcile { config } => run_reconcile(&config)?,
    }

    Ok(())
}
