//! Error types and utilities for SGraph

use thiserror::Error;

/// Result type alias for SGraph operations
pub type Result<T> = std::result::Result<T, SGraphError>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for SGraph operations
#[derive(Error, Debug)]
pub enum SGraphError {
    /// The network call could not complete (DNS, connection, timeout, bad status)
    #[error("Transport error: {message}")]
    Transport {
        /// Human-readable description
        message: String,
        /// HTTP status, when the server answered
        status_code: Option<u16>,
        /// Underlying error
        #[source]
        source: Option<BoxedSource>,
    },

    /// The response body did not have the expected shape
    #[error("Parse error: {message}")]
    Parse {
        /// Human-readable description
        message: String,
        /// Underlying error
        #[source]
        source: Option<BoxedSource>,
    },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
        /// Underlying error
        #[source]
        source: Option<BoxedSource>,
    },

    /// Validation errors for caller-supplied input
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable description
        message: String,
        /// Offending field, if known
        field: Option<String>,
    },

    /// The caller cancelled the in-flight request
    #[error("Request cancelled")]
    Cancelled,
}

impl SGraphError {
    /// Create a new transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport {
            message: msg.into(),
            status_code: None,
            source: None,
        }
    }

    /// Create a new transport error with source
    pub fn transport_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            message: msg.into(),
            status_code: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create a new transport error carrying the HTTP status
    pub fn transport_with_status(msg: impl Into<String>, status: u16) -> Self {
        Self::Transport {
            message: msg.into(),
            status_code: Some(status),
            source: None,
        }
    }

    /// Create a new parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new parse error with source
    pub fn parse_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Parse {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// HTTP status attached to a transport error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Transport { status_code, .. } => *status_code,
            _ => None,
        }
    }

    /// Whether this error came from the network layer
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Whether this error came from decoding a response body
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

// Error conversion implementations for external types

/// Convert from reqwest::Error to SGraphError
impl From<reqwest::Error> for SGraphError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::transport_with_source("Request timeout", err)
        } else if err.is_connect() {
            Self::transport_with_source("Connection failed", err)
        } else if err.is_status() {
            let status_code = err.status().map(|s| s.as_u16()).unwrap_or(0);
            Self::Transport {
                message: format!("HTTP error: {}", status_code),
                status_code: Some(status_code),
                source: Some(Box::new(err)),
            }
        } else if err.is_decode() {
            Self::parse_with_source("Failed to decode response body", err)
        } else {
            Self::transport_with_source("Network request failed", err)
        }
    }
}

/// Convert from serde_json::Error to SGraphError
impl From<serde_json::Error> for SGraphError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse_with_source("Unexpected response shape", err)
    }
}

/// Convert from serde_yaml::Error to SGraphError
impl From<serde_yaml::Error> for SGraphError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::config_with_source("YAML parsing error", err)
    }
}

/// Convert from url::ParseError to SGraphError
impl From<url::ParseError> for SGraphError {
    fn from(err: url::ParseError) -> Self {
        Self::Validation {
            message: format!("Invalid URL: {}", err),
            field: Some("base_url".to_string()),
        }
    }
}

/// Convert from std::io::Error to SGraphError
impl From<std::io::Error> for SGraphError {
    fn from(err: std::io::Error) -> Self {
        Self::config_with_source("I/O error", err)
    }
}
