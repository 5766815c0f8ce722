//! Configuration structures.

use std::path::PathBuf;

use config::ConfigError;
use pulse_flow::FlowWindows;
use pulse_indicators::IndicatorParams;
use pulse_pricing::PricingParams;
use pulse_scoring::{IndicatorSet, PresetRegistry};
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub indicators: IndicatorParams,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub pricing: PricingParams,
    #[serde(default)]
    pub flow: FlowSettings,
    #[serde(default)]
    pub data: DataSettings,
}

impl AppConfig {
    /// Check ranges and references across every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logging.validate()?;
        self.indicators
            .validate()
            .map_err(|e| ConfigError::Message(format!("indicators: {}", e)))?;
        self.pricing
            .validate()
            .map_err(|e| ConfigError::Message(format!("pricing: {}", e)))?;
        self.flow.validate()?;
        self.scoring.indicator_set(&PresetRegistry::new())?;
        Ok(())
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "pulse".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    /// Daily-rolling log file, in addition to stdout
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self.format.to_lowercase().as_str() {
            "pretty" | "json" => Ok(()),
            other => Err(ConfigError::Message(format!(
                "logging.format must be 'pretty' or 'json', got '{}'",
                other
            ))),
        }
    }
}

/// Which indicator set to score with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSettings {
    /// Preset name
    pub preset: String,
    /// Indicator ids; overrides `preset` when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom: Option<Vec<String>>,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            preset: pulse_scoring::FULL.to_string(),
            custom: None,
        }
    }
}

impl ScoringSettings {
    /// Resolve the configured set against a registry.
    pub fn indicator_set(&self, registry: &PresetRegistry) -> Result<IndicatorSet, ConfigError> {
        registry
            .resolve(&self.preset, self.custom.as_deref())
            .map_err(|e| ConfigError::Message(format!("scoring: {}", e)))
    }
}

/// Institutional flow settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowSettings {
    /// Fetch and score institutional flow
    pub enabled: bool,
    pub lookback_days: u32,
    pub windows: FlowWindows,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            lookback_days: 45,
            windows: FlowWindows::default(),
        }
    }
}

impl FlowSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.windows;
        if w.trust_days == 0 || w.foreign_days == 0 || w.consensus_days == 0 {
            return Err(ConfigError::Message(
                "flow.windows must all be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Data provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Directory of `{symbol}.csv` price files, or one CSV file
    pub prices: PathBuf,
    /// Directory of `{symbol}.csv` flow files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow: Option<PathBuf>,
    /// Calendar days of price history to request
    pub lookback_days: u32,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            prices: PathBuf::from("data/prices"),
            flow: None,
            lookback_days: 180,
        }
    }
}
