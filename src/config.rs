//! Channel configuration for the adaptor.
//!
//! The gateway binds this adaptor to one upstream channel: a base URL, a
//! two-part API key and an optional model allow-list. Configuration loads
//! from YAML and is validated before the first relay call, so a bad key or
//! URL fails at startup instead of mid-request.

use serde::{Deserialize, Serialize};

use crate::auth::KeyPair;

/// Error type for configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// One configured upstream channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub api_key: String,
    /// Models the gateway may route here. Empty means every supported model.
    #[serde(default)]
    pub models: Vec<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_name() -> String {
    crate::relay::CHANNEL_NAME.to_string()
}

fn default_base_url() -> String {
    "https://api.sensenova.cn".to_string()
}

fn default_log_level() -> String {
    "INFO".to_string()
}

/// Load a channel configuration from a YAML file and validate it.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] when reading the file fails, [`ConfigError::Yaml`]
/// when parsing fails, or [`ConfigError::Validation`] when semantic validation fails.
pub fn load_config(path: &str) -> Result<ChannelConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let config: ChannelConfig = serde_yaml::from_str(&contents)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate a channel config, returning an error if any rule is violated.
///
/// # Errors
///
/// Returns [`ConfigError::Validation`] when any configuration invariant is
/// violated.
pub fn validate_config(config: &ChannelConfig) -> Result<(), ConfigError> {
    validate_base_url(config)?;
    validate_api_key(config)?;
    validate_models(config)?;
    validate_log_level(config)?;
    Ok(())
}

fn validation_err(msg: impl Into<String>) -> ConfigError {
    ConfigError::Validation(msg.into())
}

fn validate_base_url(config: &ChannelConfig) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(&config.base_url).map_err(|err| {
        validation_err(format!(
            "Channel '{}': base_url is not a valid URL: {err}",
            config.name
        ))
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(validation_err(format!(
            "Channel '{}': base_url must use http:// or https://",
            config.name
        )));
    }
    Ok(())
}

fn validate_api_key(config: &ChannelConfig) -> Result<(), ConfigError> {
    // Same parser the token signer uses at relay time.
    KeyPair::parse(&config.api_key).map_err(|err| {
        validation_err(format!("Channel '{}': {err}", config.name))
    })?;
    Ok(())
}

fn validate_models(config: &ChannelConfig) -> Result<(), ConfigError> {
    for model in &config.models {
        if model.trim().is_empty() {
            return Err(validation_err(format!(
                "Channel '{}': model name cannot be empty",
                config.name
            )));
        }
    }
    Ok(())
}

fn validate_log_level(config: &ChannelConfig) -> Result<(), ConfigError> {
    let valid_levels = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL", "DISABLED"];
    if !valid_levels.contains(&config.log_level.to_uppercase().as_str()) {
        return Err(validation_err(format!(
            "log_level must be one of {valid_levels:?}"
        )));
    }
    Ok(())
}
