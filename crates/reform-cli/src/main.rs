//! Reform CLI
//!
//! Improve renovation descriptions with retrieved context.

use anyhow::Result;
use clap::Parser;
use reform_core::Settings;
use std::sync::Arc;

mod app;
mod commands;

use app::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = Arc::new(Settings::load()?);

    match cli.command {
        Commands::Improve(args) => commands::improve::run(args, settings, cli.format).await,
        Commands::Serve(args) => commands::serve::run(args, settings).await,
        Commands::Collections => commands::collections::run(&settings, cli.format).await,
        Commands::Config => commands::config::run(&settings, cli.format),
    }
}
