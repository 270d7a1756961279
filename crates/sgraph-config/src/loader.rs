//! Configuration loading utilities

use crate::schema::{Config, DayKeying};
use crate::validator::ConfigValidator;
use sgraph_common::SGraphError;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "SGRAPH_CONFIG_PATH";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[source] SGraphError),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {message}")]
    EnvParseError {
        /// Variable name
        var: String,
        /// Parse failure
        message: String,
    },
}

impl From<ConfigError> for SGraphError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ValidationError(inner) => inner,
            other => SGraphError::config_with_source("Configuration loading failed", other),
        }
    }
}

/// Configuration loader for the data source
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        debug!(path = %path.as_ref().display(), "Reading configuration file");
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config = Self::parse_yaml(&content)?;

        Self::apply_env_overrides(&mut config, |var| env::var(var).ok())?;
        ConfigValidator::validate(&config).map_err(ConfigError::ValidationError)?;

        Ok(config)
    }

    /// Parse YAML; absent sections and fields take their defaults
    pub fn parse_yaml(content: &str) -> Result<Config, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load from `SGRAPH_CONFIG_PATH`, then `sgraph.yaml`, then defaults
    pub fn load() -> sgraph_common::Result<Config> {
        let config = if let Ok(config_path) = env::var(CONFIG_PATH_ENV) {
            Self::load_config(&config_path)?
        } else if Path::new("sgraph.yaml").exists() {
            Self::load_config("sgraph.yaml")?
        } else if Path::new("sgraph.yml").exists() {
            Self::load_config("sgraph.yml")?
        } else {
            let mut config = Config::default();
            Self::apply_env_overrides(&mut config, |var| env::var(var).ok())?;
            ConfigValidator::validate(&config).map_err(ConfigError::ValidationError)?;
            config
        };

        info!(base_url = %config.datasource.base_url, "Configuration loaded");
        Ok(config)
    }

    /// Apply overrides looked up through `lookup`
    pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SGRAPH_BASE_URL") {
            config.datasource.base_url = url;
        }

        if let Some(timeout) = lookup("SGRAPH_TIMEOUT_SECS") {
            config.datasource.timeout_secs =
                timeout.parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::EnvParseError {
                        var: "SGRAPH_TIMEOUT_SECS".to_string(),
                        message: e.to_string(),
                    }
                })?;
        }

        if let Some(keying) = lookup("SGRAPH_DAY_KEYING") {
            config.datasource.day_keying =
                keying
                    .parse::<DayKeying>()
                    .map_err(|message| ConfigError::EnvParseError {
                        var: "SGRAPH_DAY_KEYING".to_string(),
                        message,
                    })?;
        }

        if let Some(level) = lookup("SGRAPH_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(())
    }
}

impl Config {
    /// Log settings in the shape `sgraph_common::init_logging` takes
    pub fn logging_config(&self) -> sgraph_common::LoggingConfig {
        sgraph_common::LoggingConfig {
            level: self.logging.level.clone(),
            json_format: self.logging.json,
            pretty_format: !self.logging.json,
            file_path: self.logging.file.clone(),
            ..sgraph_common::LoggingConfig::default()
        }
    }
}
