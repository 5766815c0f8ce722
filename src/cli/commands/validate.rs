//! Validate configuration command.

use anyhow::{Context, Result};
use pulse_config::AppConfig;
use pulse_scoring::PresetRegistry;
use std::path::Path;

pub async fn run(config_path: Option<&Path>, config: &AppConfig) -> Result<()> {
    match config_path {
        Some(path) => println!("Validating configuration: {:?}", path),
        None => println!("Validating configuration from environment"),
    }

    let set = config
        .scoring
        .indicator_set(&PresetRegistry::new())
        .context("Scoring configuration is invalid")?;

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Indicator set: {} ({} indicators)", set.name(), set.len());
    println!("Risk multiplier: {}", config.pricing.risk_multiplier);
    println!("Reward ratio: {}", config.pricing.reward_ratio);
    println!("Flow enabled: {}", config.flow.enabled);
    println!("Price data: {}", config.data.prices.display());
    println!();
    println!("Effective configuration:");
    println!("{}", config.to_toml_string()?);

    Ok(())
}
