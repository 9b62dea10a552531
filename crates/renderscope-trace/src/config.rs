//! Monitor configuration — defaults, environment loading, and the partial
//! update record applied at runtime.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable toggling metric collection.
pub const ENV_ENABLED: &str = "RENDERSCOPE_ENABLED";
/// Environment variable setting the sampling rate.
pub const ENV_SAMPLING_RATE: &str = "RENDERSCOPE_SAMPLING_RATE";

/// Errors that can occur while loading monitor configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid boolean '{value}' for {name}")]
    InvalidBoolean { name: &'static str, value: String },

    #[error("invalid sampling rate '{value}' for {name}")]
    InvalidRate { name: &'static str, value: String },
}

/// Full monitor configuration.
///
/// An out-of-range sampling rate is not a configuration error — it is
/// clamped into `[0, 1]` when applied to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Whether metric collection starts enabled.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Initial sampling rate.
    #[serde(default = "default_sampling_rate")]
    pub sampling_rate: f64,
}

fn default_enabled() -> bool {
    true
}

fn default_sampling_rate() -> f64 {
    1.0
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            sampling_rate: default_sampling_rate(),
        }
    }
}

impl MonitorConfig {
    /// Load configuration from the process environment. Unset variables
    /// fall back to the defaults; malformed values are rejected.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(value) = std::env::var(ENV_ENABLED) {
            config.enabled = parse_bool(ENV_ENABLED, &value)?;
        }
        if let Ok(value) = std::env::var(ENV_SAMPLING_RATE) {
            config.sampling_rate =
                value
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| ConfigError::InvalidRate {
                        name: ENV_SAMPLING_RATE,
                        value,
                    })?;
        }

        Ok(config)
    }
}

/// Partial configuration update applied to a running monitor; unset fields
/// leave the current value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitorOptions {
    pub enabled: Option<bool>,
    pub sampling_rate: Option<f64>,
}

impl From<MonitorConfig> for MonitorOptions {
    fn from(config: MonitorConfig) -> Self {
        Self {
            enabled: Some(config.enabled),
            sampling_rate: Some(config.sampling_rate),
        }
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBoolean {
            name,
            value: value.to_string(),
        }),
    }
}
