//! Orderly CLI - deterministic build order for multi-project workspaces
//!
//! Entry point for the orderly command-line application.

use anyhow::Result;
use clap::Parser;

use orderly::cli::output::{display_error, OutputConfig};
use orderly::cli::Cli;
use orderly::core::global_config::GlobalConfig;
use orderly::infra::dirs::OrderlyDirs;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber; -v raises the default level
    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    // Apply output configuration globally; flags win over the config file
    let global = GlobalConfig::load(&OrderlyDirs::new()).unwrap_or_default();
    let output_config =
        OutputConfig::new(global.quiet(cli.quiet), global.json(cli.json), cli.verbose);
    output_config.apply_global();

    // Run the command and handle errors
    match cli.run().await {
        Ok(()) => Ok(()),
        Err(e) => {
            display_error(&e);
            std::process::exit(1);
        }
    }
}
