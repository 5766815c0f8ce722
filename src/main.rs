//! Daily strength scoring CLI.

mod cli;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use logging::setup_logging;
use pulse_config::{load_config, load_from_env, AppConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load(&cli)?;

    let log_level = match cli.log_level {
        Some(cli::LogLevel::Trace) => "trace",
        Some(cli::LogLevel::Debug) => "debug",
        Some(cli::LogLevel::Info) => "info",
        Some(cli::LogLevel::Warn) => "warn",
        Some(cli::LogLevel::Error) => "error",
        None => config.logging.level.as_str(),
    };
    let json = cli.json_logs || config.logging.is_json();
    let _guard = setup_logging(
        log_level,
        json,
        config.logging.file.as_deref().map(std::path::Path::new),
    );

    match cli.command {
        Commands::Analyze(args) => cli::commands::analyze::run(args, &config).await,
        Commands::Presets => cli::commands::presets::run().await,
        Commands::ValidateConfig => cli::commands::validate::run(cli.config.as_deref(), &config).await,
    }
}

fn load(cli: &Cli) -> Result<AppConfig> {
    match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => load_from_env().context("Failed to load configuration from environment"),
    }
}
