//! Test utilities and shared test helpers for SGraph.
//!
//! Fixtures for scrobble API bodies, a minimal HTTP stub server and
//! proptest strategies shared by the unit and integration tests of every
//! crate in the workspace.

use chrono::{DateTime, TimeZone, Utc};
use std::sync::{Arc, Mutex, Once};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialize logging for tests. Safe to call multiple times.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Test fixture for a fixed UTC instant.
pub fn mock_timestamp(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
        .unwrap()
}

/// Scrobble API response fixtures.
pub mod scrobble_fixtures {
    use serde_json::{json, Value};

    /// One track record; `None` yields a "now playing" entry without `date`.
    pub fn track(name: &str, uts: Option<i64>) -> Value {
        match uts {
            Some(uts) => json!({
                "name": name,
                "artist": { "#text": "Test Artist" },
                "date": { "uts": uts.to_string(), "#text": "irrelevant" }
            }),
            None => json!({
                "name": name,
                "artist": { "#text": "Test Artist" },
                "@attr": { "nowplaying": "true" }
            }),
        }
    }

    /// A full `recenttracks` body for the given timestamps, newest first.
    pub fn recent_tracks_body(timestamps: &[Option<i64>]) -> String {
        let tracks: Vec<Value> = timestamps
            .iter()
            .enumerate()
            .map(|(i, uts)| track(&format!("Track {}", i + 1), *uts))
            .collect();
        json!({
            "recenttracks": {
                "track": tracks,
                "@attr": { "user": "rj", "page": "1", "perPage": "200" }
            }
        })
        .to_string()
    }
}

/// A canned HTTP/1.1 server that answers every request with the same response.
pub struct StubServer {
    /// `http://127.0.0.1:<port>`
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl StubServer {
    /// Starts a server replying `status` with `body` to each connection.
    pub async fn start(status: u16, body: impl Into<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub server");
        let addr = listener.local_addr().expect("Stub server has no address");
        let body = body.into();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        let handle = tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = vec![0u8; 8192];
                let mut read = 0;
                while read < buf.len() {
                    match socket.read(&mut buf[read..]).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => read += n,
                    }
                    if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                let head = String::from_utf8_lossy(&buf[..read]).to_string();
                if let Some(line) = head.lines().next() {
                    seen.lock().unwrap().push(line.to_string());
                }
                let response = format!(
                    "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
            handle,
        }
    }

    /// Request lines received so far, e.g. `GET /info HTTP/1.1`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Returns a base URL nothing is listening on.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind probe port");
    let addr = listener.local_addr().expect("Probe port has no address");
    drop(listener);
    format!("http://{}", addr)
}

/// Property-based testing utilities using proptest.
#[cfg(any(test, feature = "proptest"))]
pub mod property_testing {
    use proptest::prelude::*;

    /// Epoch seconds between 2001 and 2033.
    pub fn epoch_seconds_strategy() -> impl Strategy<Value = i64> {
        1_000_000_000i64..2_000_000_000i64
    }

    /// Event lists where roughly one in five entries has no timestamp.
    pub fn play_timestamps_strategy() -> impl Strategy<Value = Vec<Option<i64>>> {
        prop::collection::vec(
            prop_oneof![
                4 => epoch_seconds_strategy().prop_map(Some),
                1 => Just(None),
            ],
            0..200,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_init_logging_multiple_calls() {
        init_test_logging();
        init_test_logging();
    }

    #[test]
    fn test_mock_timestamp() {
        let timestamp = mock_timestamp(2024, 1, 1, 12, 0, 0);
        assert_eq!(timestamp.year(), 2024);
        assert_eq!(timestamp.day(), 1);
        assert_eq!(timestamp.hour(), 12);
    }

    #[test]
    fn test_recent_tracks_body_shape() {
        let body = scrobble_fixtures::recent_tracks_body(&[Some(1_700_000_000), None]);
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        let tracks = value["recenttracks"]["track"].as_array().unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0]["date"]["uts"], "1700000000");
        assert!(tracks[1].get("date").is_none());
    }

    #[tokio::test]
    async fn test_stub_server_records_requests() {
        let server = StubServer::start(200, "{}").await;
        let response = reqwest::get(format!("{}/info", server.base_url))
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(server.requests(), vec!["GET /info HTTP/1.1".to_string()]);
    }
}
