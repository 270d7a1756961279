//! Integration tests for sgraph-series crate.
//!
//! These tests run the full fetch, parse and aggregate pipeline against a
//! local stub server.

use chrono::FixedOffset;
use sgraph_common::test_utils::{
    init_test_logging, mock_timestamp, scrobble_fixtures::recent_tracks_body,
    unreachable_base_url, StubServer,
};
use sgraph_common::{RefId, UserName};
use sgraph_config::{DataSourceSettings, DayKeying};
use sgraph_series::{PlayHistoryAggregator, ScrobbleClient, PLAYS_FIELD};

fn utc_plus_3() -> FixedOffset {
    FixedOffset::east_opt(3 * 3600).unwrap()
}

#[tokio::test]
async fn test_history_pipeline_end_to_end() {
    init_test_logging();

    let body = recent_tracks_body(&[
        None,
        Some(1_700_000_000),
        Some(1_700_050_000),
        Some(1_702_600_000),
    ]);
    let server = StubServer::start(200, body).await;
    let client = ScrobbleClient::new(&DataSourceSettings::new(server.base_url.clone())).unwrap();
    let options = client.fetch_options();
    let aggregator =
        PlayHistoryAggregator::new(client, DayKeying::CalendarDate).with_timezone(utc_plus_3());

    let table = aggregator
        .daily_play_counts(RefId::from("A"), &UserName::parse("rj").unwrap(), &options)
        .await
        .unwrap();

    assert_eq!(
        table.rows(PLAYS_FIELD),
        vec![(1_700_000_000_000, 2.0), (1_702_600_000_000, 1.0)]
    );
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_empty_history_is_not_an_error() {
    let server = StubServer::start(200, recent_tracks_body(&[None])).await;
    let client = ScrobbleClient::new(&DataSourceSettings::new(server.base_url.clone())).unwrap();
    let options = client.fetch_options();
    let aggregator = PlayHistoryAggregator::new(client, DayKeying::CalendarDate);

    let table = aggregator
        .daily_play_counts(RefId::from("A"), &UserName::parse("rj").unwrap(), &options)
        .await
        .unwrap();

    assert!(table.is_empty());
    assert_eq!(table.fields().len(), 2);
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let client = ScrobbleClient::new(&DataSourceSettings::new(unreachable_base_url().await)).unwrap();
    let options = client.fetch_options();
    let aggregator = PlayHistoryAggregator::new(client, DayKeying::CalendarDate);

    let err = aggregator
        .daily_play_counts(RefId::from("A"), &UserName::parse("rj").unwrap(), &options)
        .await
        .unwrap_err();

    assert!(err.is_transport());
}

#[tokio::test]
async fn test_legacy_keying_merges_years() {
    let this_year = mock_timestamp(2023, 11, 15, 12, 0, 0).timestamp();
    let last_year = mock_timestamp(2022, 11, 15, 12, 0, 0).timestamp();
    let server = StubServer::start(200, recent_tracks_body(&[Some(this_year), Some(last_year)])).await;
    let client = ScrobbleClient::new(&DataSourceSettings::new(server.base_url.clone())).unwrap();
    let options = client.fetch_options();
    let aggregator =
        PlayHistoryAggregator::new(client, DayKeying::DayOfMonth).with_timezone(utc_plus_3());

    let table = aggregator
        .daily_play_counts(RefId::from("A"), &UserName::parse("rj").unwrap(), &options)
        .await
        .unwrap();

    assert_eq!(table.rows(PLAYS_FIELD), vec![(this_year * 1000, 2.0)]);
}
