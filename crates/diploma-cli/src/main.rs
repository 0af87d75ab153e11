//! Diploma CLI — Run batches of calls against a credential registry
//! deployment.
//!
//! Subcommands: init, apply, show.

mod batch;
mod commands;
mod config;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use config::{DiplomaConfig, LoggingConfig};

/// Diploma — Role-gated academic credential registry.
#[derive(Parser, Debug)]
#[command(name = "diploma", version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, global = true, default_value = "diploma.toml")]
    config: PathBuf,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default configuration file.
    Init(commands::init::InitArgs),
    /// Execute a batch of calls and print the receipts.
    Apply(commands::apply::ApplyArgs),
    /// Execute a batch of calls and display one credential.
    Show(commands::show::ShowArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.command {
        Commands::Init(_) => DiplomaConfig::default(),
        _ => DiplomaConfig::load(&cli.config)?,
    };
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config.logging);

    match &cli.command {
        Commands::Init(args) => commands::init::run(args, &cli.config),
        Commands::Apply(args) => commands::apply::run(args, &config),
        Commands::Show(args) => commands::show::run(args, &config),
    }
}

/// Logs go to stderr so receipts on stdout stay machine-readable.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
