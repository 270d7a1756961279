//! Integration tests for sgraph-datasource crate.
//!
//! These tests drive the query executor and the connectivity probe against
//! a local stub server.

use chrono::FixedOffset;
use sgraph_common::test_utils::{
    init_test_logging, scrobble_fixtures::recent_tracks_body, unreachable_base_url, StubServer,
};
use sgraph_common::{RefId, SGraphError};
use sgraph_config::{DataSourceSettings, QueryConfig};
use sgraph_datasource::{HealthStatus, QueryRequest, ScrobbleDataSource};
use sgraph_series::{PLAYS_FIELD, VALUE_FIELD};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

async fn datasource_for(status: u16, body: String) -> (StubServer, ScrobbleDataSource<FixedOffset>) {
    let server = StubServer::start(status, body).await;
    let datasource = ScrobbleDataSource::new(DataSourceSettings::new(server.base_url.clone()))
        .unwrap()
        .with_timezone(FixedOffset::east_opt(3 * 3600).unwrap());
    (server, datasource)
}

#[tokio::test]
async fn test_mixed_targets_keep_target_order() {
    init_test_logging();

    let body = recent_tracks_body(&[Some(1_700_000_000), Some(1_700_050_000), Some(1_702_600_000)]);
    let (server, datasource) = datasource_for(200, body).await;
    let request = QueryRequest::new(
        1_699_000_000_000,
        1_703_000_000_000,
        vec![
            QueryConfig::new("A").with_user("rj"),
            QueryConfig::new("B").with_constant(1.5),
        ],
    );

    let response = datasource.query(&request).await.unwrap();

    assert_eq!(response.data.len(), 2);
    assert_eq!(response.data[0].ref_id(), &RefId::from("A"));
    assert_eq!(
        response.data[0].rows(PLAYS_FIELD),
        vec![(1_700_000_000_000, 2.0), (1_702_600_000_000, 1.0)]
    );
    assert_eq!(
        response.data[1].rows(VALUE_FIELD),
        vec![(1_699_000_000_000, 1.5), (1_703_000_000_000, 1.5)]
    );
    assert_eq!(
        server.requests(),
        vec!["GET /tracks?limit=200&user=rj HTTP/1.1".to_string()]
    );
}

#[tokio::test]
async fn test_history_failure_names_the_target() {
    let (_server, datasource) = datasource_for(200, r#"{"unexpected": true}"#.to_string()).await;
    let request = QueryRequest::new(0, 1, vec![QueryConfig::new("Z").with_user("rj")]);

    let err = datasource.query(&request).await.unwrap_err();

    assert!(err.to_string().contains("'Z'"));
    assert!(err.inner().is_parse());
}

#[tokio::test]
async fn test_cancelled_query() {
    let (_server, datasource) = datasource_for(200, recent_tracks_body(&[])).await;
    let request = QueryRequest::new(0, 1, vec![QueryConfig::new("A").with_user("rj")]);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = datasource.query_with_cancel(&request, &cancel).await.unwrap_err();

    assert!(matches!(err.inner(), SGraphError::Cancelled));
}

#[tokio::test]
async fn test_probe_success_on_200() {
    let (server, datasource) = datasource_for(200, "{}".to_string()).await;

    let result = datasource.test_datasource().await;

    assert_eq!(result.status, HealthStatus::Success);
    assert_eq!(result.message, "API Key valid!");
    assert_eq!(server.requests(), vec!["GET /info HTTP/1.1".to_string()]);
}

#[tokio::test]
async fn test_probe_failure_on_error_statuses() {
    for status in [404, 500] {
        let (_server, datasource) = datasource_for(status, "{}".to_string()).await;

        let result = datasource.test_datasource().await;

        assert_eq!(result.status, HealthStatus::Failure);
        assert!(!result.message.is_empty());
    }
}

#[tokio::test]
async fn test_probe_failure_when_unreachable() {
    let datasource =
        ScrobbleDataSource::new(DataSourceSettings::new(unreachable_base_url().await)).unwrap();

    let result = datasource.test_datasource().await;

    assert_eq!(result.status, HealthStatus::Failure);
    assert_eq!(result.message, "API Key invalid!");
}

#[tokio::test]
async fn test_probe_failure_on_timeout() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let silent = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    let datasource =
        ScrobbleDataSource::new(DataSourceSettings::new(base_url).with_timeout(1)).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), datasource.test_datasource())
        .await
        .expect("probe should give up on its own deadline");

    assert_eq!(result.status, HealthStatus::Failure);
    silent.abort();
}
