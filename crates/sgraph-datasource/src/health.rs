//! Connectivity probe against the configured endpoint.

use serde::{Deserialize, Serialize};

/// Message reported when the probe gets a 200.
pub const PROBE_SUCCESS_MESSAGE: &str = "API Key valid!";
/// Message reported for any other outcome.
pub const PROBE_FAILURE_MESSAGE: &str = "API Key invalid!";

/// Outcome of a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Endpoint answered 200.
    Success,
    /// Anything else.
    Failure,
}

/// What the host shows after testing the data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckResult {
    /// Probe outcome.
    pub status: HealthStatus,
    /// Human-readable summary.
    pub message: String,
}

impl HealthCheckResult {
    /// Maps a probe status code; only exactly 200 counts as success.
    pub fn from_status(status: u16) -> Self {
        if status == 200 {
            Self::success()
        } else {
            Self::failure()
        }
    }

    /// Successful result with the standard message.
    pub fn success() -> Self {
        Self {
            status: HealthStatus::Success,
            message: PROBE_SUCCESS_MESSAGE.to_string(),
        }
    }

    /// Failed result with the standard message.
    pub fn failure() -> Self {
        Self {
            status: HealthStatus::Failure,
            message: PROBE_FAILURE_MESSAGE.to_string(),
        }
    }

    /// Whether the probe succeeded.
    pub fn is_success(&self) -> bool {
        self.status == HealthStatus::Success
    }
}
