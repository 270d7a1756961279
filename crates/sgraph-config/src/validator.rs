//! Runtime validation of loaded settings.

use crate::schema::{Config, DataSourceSettings};
use sgraph_common::{Result, SGraphError};
use url::Url;

/// Longest accepted request deadline.
pub const MAX_TIMEOUT_SECS: u64 = 300;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a whole configuration.
    pub fn validate(config: &Config) -> Result<()> {
        Self::validate_datasource(&config.datasource)
    }

    /// Validates endpoint settings.
    pub fn validate_datasource(settings: &DataSourceSettings) -> Result<()> {
        validate_base_url(&settings.base_url)?;

        if settings.timeout_secs == 0 || settings.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(SGraphError::validation_field(
                format!("Timeout must be between 1 and {} seconds", MAX_TIMEOUT_SECS),
                "timeout_secs",
            ));
        }

        Ok(())
    }
}

/// Checks that `base_url` is a non-empty absolute http(s) URL.
pub fn validate_base_url(base_url: &str) -> Result<Url> {
    if base_url.trim().is_empty() {
        return Err(SGraphError::validation_field(
            "Base URL cannot be empty",
            "base_url",
        ));
    }

    let url = Url::parse(base_url.trim())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(SGraphError::validation_field(
            format!("Unsupported URL scheme '{}'", scheme),
            "base_url",
        )),
    }
}
