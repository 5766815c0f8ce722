//! Configuration management.

mod settings;

pub use settings::{AppConfig, AppSettings, DataSettings, FlowSettings, LoggingConfig, ScoringSettings};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Environment prefix: `PULSE__PRICING__REWARD_RATIO=2.5`.
pub const ENV_PREFIX: &str = "PULSE";

/// Load configuration from file and environment.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    build(Some(path), ENV_PREFIX)
}

/// Load configuration from defaults and environment only.
pub fn load_from_env() -> Result<AppConfig, ConfigError> {
    build(None, ENV_PREFIX)
}

fn build(path: Option<&Path>, env_prefix: &str) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }

    let config = builder
        .add_source(
            Environment::with_prefix(env_prefix)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app: AppConfig = config.try_deserialize()?;
    app.validate()?;
    Ok(app)
}
