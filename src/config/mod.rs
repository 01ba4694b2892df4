pub mod pipeline;
pub mod settings;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "recon-etl")]
#[command(about = "Reconciles pending CSV files against a remote endpoint into ok/error outputs")]
pub struct CliConfig {
    /// TOML file with default settings (environment variables take precedence)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// .env file to load (defaults to ./.env when present)
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print the batch report as JSON on stdout
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Submit exchange-rate rows to the SOAP import service
    ExchangeRates {
        /// List pending files without processing them
        #[arg(long)]
        dry_run: bool,
    },
    /// Insert cede-interface rows into the CEDE_INTERFACE table
    Cede {
        /// List pending files without processing them
        #[arg(long)]
        dry_run: bool,
    },
}

impl Command {
    pub fn dry_run(&self) -> bool {
        match self {
            Command::ExchangeRates { dry_run } | Command::Cede { dry_run } => *dry_run,
        }
    }
}
