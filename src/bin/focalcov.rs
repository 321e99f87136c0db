//! focalcov CLI - focal method / test method dataset curation
//!
//! Runs the curation processors over JSON Lines files and exposes the
//! parser and mapper for inspecting single files and checkouts.

use clap::Parser;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging; RUST_LOG overrides the default level
    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    // Execute command
    match cli.command {
        Commands::Repositories(args) => {
            cli::repositories_command(args).await?;
        }
        Commands::CoverageSamples(args) => {
            cli::coverage_samples_command(args).await?;
        }
        Commands::UniqueSamples(args) => {
            cli::unique_samples_command(args).await?;
        }
        Commands::Copy(args) => {
            cli::copy_command(args).await?;
        }
        Commands::Parse(args) => {
            cli::parse_command(args).await?;
        }
        Commands::FocalMethods(args) => {
            cli::focal_methods_command(args).await?;
        }
        Commands::PrintDefaultConfig => {
            cli::print_default_config().await?;
        }
        Commands::ValidateConfig(args) => {
            cli::validate_config(args).await?;
        }
    }

    Ok(())
}
