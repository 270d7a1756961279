//! HTTP client for the scrobble API.

use crate::play_event::{parse_recent_tracks, PlayEvent};
use crate::traits::{FetchOptions, PlayHistorySource};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use sgraph_common::{Result, SGraphError, UserName};
use sgraph_config::{validate_base_url, DataSourceSettings};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Number of plays requested per fetch. Only the first page is read.
pub const RECENT_TRACKS_LIMIT: u32 = 200;

/// Scrobble API client bound to one endpoint.
#[derive(Debug, Clone)]
pub struct ScrobbleClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl ScrobbleClient {
    /// Creates a client for the configured endpoint.
    pub fn new(settings: &DataSourceSettings) -> Result<Self> {
        let base_url = validate_base_url(&settings.base_url)?;
        let timeout = Duration::from_secs(settings.timeout_secs);

        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(settings.max_idle_per_host)
            .build()
            .map_err(|e| SGraphError::transport_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Fetch options using this client's configured deadline.
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions::with_timeout(self.timeout)
    }

    /// Endpoint root without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Runs `fut` under the caller's deadline and cancellation token.
    async fn with_deadline<T, F>(options: &FetchOptions, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        tokio::select! {
            biased;
            () = options.cancel.cancelled() => {
                warn!("Request cancelled by caller");
                Err(SGraphError::Cancelled)
            }
            outcome = tokio::time::timeout(options.timeout, fut) => match outcome {
                Ok(result) => result,
                Err(_) => Err(SGraphError::transport(format!(
                    "Request timed out after {:?}",
                    options.timeout
                ))),
            },
        }
    }

    async fn send(request: RequestBuilder) -> Result<Response> {
        request.send().await.map_err(|e| {
            warn!(error = %e, "Request failed");
            SGraphError::from(e)
        })
    }

    /// Fetches the raw recent-tracks body for `user`.
    #[instrument(skip(self, user, options), fields(user = %user))]
    pub async fn fetch_recent_tracks_body(
        &self,
        user: &UserName,
        options: &FetchOptions,
    ) -> Result<String> {
        let url = self.endpoint("tracks");
        let limit = RECENT_TRACKS_LIMIT.to_string();
        let request = self
            .client
            .get(&url)
            .query(&[("limit", limit.as_str()), ("user", user.as_str())]);
        debug!("Requesting {}", url);

        Self::with_deadline(options, async move {
            let response = Self::send(request).await?;
            let status = response.status();
            if !status.is_success() {
                warn!(status = status.as_u16(), "Recent tracks request rejected");
                return Err(SGraphError::transport_with_status(
                    format!("API returned status {}", status),
                    status.as_u16(),
                ));
            }
            response
                .text()
                .await
                .map_err(|e| SGraphError::transport_with_source("Failed to read response body", e))
        })
        .await
    }

    /// Calls `/info` and returns the HTTP status, whatever it is.
    #[instrument(skip(self, options))]
    pub async fn check_info(&self, options: &FetchOptions) -> Result<u16> {
        let request = self.client.get(self.endpoint("info"));
        let status = Self::with_deadline(options, async move {
            Self::send(request).await.map(|r| r.status().as_u16())
        })
        .await?;
        debug!(status, "Info endpoint answered");
        Ok(status)
    }
}

#[async_trait]
impl PlayHistorySource for ScrobbleClient {
    async fn fetch_recent_plays(
        &self,
        user: &UserName,
        options: &FetchOptions,
    ) -> Result<Vec<PlayEvent>> {
        let body = self.fetch_recent_tracks_body(user, options).await?;
        let events = parse_recent_tracks(&body)?;
        info!(user = %user, events = events.len(), "Fetched recent plays");
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sgraph_common::test_utils::{scrobble_fixtures::recent_tracks_body, StubServer};

    #[test]
    fn test_endpoint_building() {
        let client = ScrobbleClient::new(&DataSourceSettings::new("http://example.com/api/")).unwrap();
        assert_eq!(client.base_url(), "http://example.com/api");
        assert_eq!(client.endpoint("tracks"), "http://example.com/api/tracks");
        assert_eq!(client.endpoint("/info"), "http://example.com/api/info");
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let err = ScrobbleClient::new(&DataSourceSettings::new("  ")).unwrap_err();
        assert!(matches!(err, SGraphError::Validation { .. }));
    }

    #[test]
    fn test_fetch_options_use_configured_timeout() {
        let client =
            ScrobbleClient::new(&DataSourceSettings::new("http://example.com").with_timeout(7)).unwrap();
        assert_eq!(client.fetch_options().timeout, Duration::from_secs(7));
    }

    #[tokio::test]
    async fn test_fetch_sends_limit_and_user() {
        let server = StubServer::start(200, recent_tracks_body(&[Some(1_700_000_000), None])).await;
        let client = ScrobbleClient::new(&DataSourceSettings::new(server.base_url.clone())).unwrap();
        let user = UserName::parse("rj").unwrap();

        let events = client
            .fetch_recent_plays(&user, &client.fetch_options())
            .await
            .unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(
            server.requests(),
            vec!["GET /tracks?limit=200&user=rj HTTP/1.1".to_string()]
        );
    }

    #[tokio::test]
    async fn test_error_status_is_transport_error() {
        let server = StubServer::start(500, "oops").await;
        let client = ScrobbleClient::new(&DataSourceSettings::new(server.base_url.clone())).unwrap();
        let user = UserName::parse("rj").unwrap();

        let err = client
            .fetch_recent_plays(&user, &client.fetch_options())
            .await
            .unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.status_code(), Some(500));
    }

    #[tokio::test]
    async fn test_wrong_shape_is_parse_error() {
        let server = StubServer::start(200, r#"{"tracks": []}"#).await;
        let client = ScrobbleClient::new(&DataSourceSettings::new(server.base_url.clone())).unwrap();
        let user = UserName::parse("rj").unwrap();

        let err = client
            .fetch_recent_plays(&user, &client.fetch_options())
            .await
            .unwrap_err();
        assert!(err.is_parse());
    }

    #[tokio::test]
    async fn test_cancelled_before_send() {
        let server = StubServer::start(200, recent_tracks_body(&[])).await;
        let client = ScrobbleClient::new(&DataSourceSettings::new(server.base_url.clone())).unwrap();
        let user = UserName::parse("rj").unwrap();
        let options = client.fetch_options();
        options.cancel.cancel();

        let err = client.fetch_recent_plays(&user, &options).await.unwrap_err();
        assert!(matches!(err, SGraphError::Cancelled));
    }

    #[tokio::test]
    async fn test_deadline_expires_against_silent_server() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        // Accept and hold connections without ever answering.
        let silent = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let client = ScrobbleClient::new(&DataSourceSettings::new(base_url)).unwrap();
        let options = FetchOptions::with_timeout(Duration::from_millis(100));

        let err = client.check_info(&options).await.unwrap_err();
        assert!(err.is_transport());
        assert!(err.to_string().contains("timed out"));
        silent.abort();
    }
}
