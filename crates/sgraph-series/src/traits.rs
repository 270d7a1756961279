//! The fetch boundary between aggregation and the network.

use crate::play_event::PlayEvent;
use async_trait::async_trait;
use sgraph_common::{Result, UserName};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Deadline and cancellation handle threaded through every fetch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Upper bound for sending the request and reading the body.
    pub timeout: Duration,
    /// Cancelling this token aborts the in-flight request.
    pub cancel: CancellationToken,
}

impl FetchOptions {
    /// Options with the given deadline and a fresh token.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            cancel: CancellationToken::new(),
        }
    }

    /// Replaces the cancellation token, e.g. with a child of the host's token.
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::with_timeout(Duration::from_secs(sgraph_config::DEFAULT_TIMEOUT_SECS))
    }
}

/// Source of a user's most recent plays.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlayHistorySource: Send + Sync {
    /// Fetches one page of recent plays, newest first.
    async fn fetch_recent_plays(
        &self,
        user: &UserName,
        options: &FetchOptions,
    ) -> Result<Vec<PlayEvent>>;
}
