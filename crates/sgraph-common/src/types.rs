//! Common type definitions and newtype wrappers for domain modeling.

use crate::error::{Result, SGraphError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A scrobbling service user name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    /// Creates a user name, rejecting blank input.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(SGraphError::validation_field(
                "User name cannot be empty",
                "user",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The user name as sent on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a query target; echoed back on the table that answers it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefId(pub String);

impl fmt::Display for RefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RefId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RefId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
