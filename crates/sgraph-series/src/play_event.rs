//! Play events and decoding of the recent-tracks response body.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use sgraph_common::{Result, SGraphError};
use tracing::debug;

/// A single listening event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayEvent {
    /// Track title, informational only.
    pub track_name: String,
    /// Epoch seconds; absent for the track currently playing.
    pub played_at: Option<i64>,
}

impl PlayEvent {
    /// An event played at `played_at` epoch seconds.
    pub fn new(track_name: impl Into<String>, played_at: Option<i64>) -> Self {
        Self {
            track_name: track_name.into(),
            played_at,
        }
    }

    /// The play instant, if the event has a representable timestamp.
    pub fn played_at_utc(&self) -> Option<DateTime<Utc>> {
        self.played_at
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// The play instant located on `tz`'s calendar.
    pub fn played_at_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        self.played_at_utc().map(|utc| utc.with_timezone(tz))
    }
}

#[derive(Debug, Deserialize)]
struct RecentTracksEnvelope {
    recenttracks: RecentTracksPage,
}

#[derive(Debug, Deserialize)]
struct RecentTracksPage {
    track: TrackList,
}

// The API collapses single-element lists into a bare object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TrackList {
    Many(Vec<Value>),
    One(Map<String, Value>),
}

#[derive(Debug, Deserialize)]
struct RawTrack {
    #[serde(default)]
    name: Option<Value>,
    #[serde(default)]
    date: Option<RawDate>,
}

#[derive(Debug, Deserialize)]
struct RawDate {
    #[serde(default)]
    uts: Option<Uts>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Uts {
    Number(i64),
    Text(String),
}

impl Uts {
    fn seconds(&self) -> Option<i64> {
        match self {
            Self::Number(secs) => Some(*secs),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }
}

/// Decodes a `{"recenttracks": {"track": [...]}}` body into play events.
///
/// Unreadable records become events without a timestamp. A body without the
/// track list is a parse error.
pub fn parse_recent_tracks(body: &str) -> Result<Vec<PlayEvent>> {
    let envelope: RecentTracksEnvelope = serde_json::from_str(body).map_err(|e| {
        SGraphError::parse_with_source("Response is missing the recenttracks.track list", e)
    })?;

    let records = match envelope.recenttracks.track {
        TrackList::Many(records) => records,
        TrackList::One(record) => vec![Value::Object(record)],
    };

    let events: Vec<PlayEvent> = records.into_iter().map(decode_record).collect();
    debug!(
        records = events.len(),
        timestamped = events.iter().filter(|e| e.played_at.is_some()).count(),
        "Decoded recent tracks"
    );
    Ok(events)
}

fn decode_record(record: Value) -> PlayEvent {
    match serde_json::from_value::<RawTrack>(record) {
        Ok(raw) => PlayEvent {
            played_at: raw
                .date
                .and_then(|date| date.uts)
                .and_then(|uts| uts.seconds()),
            track_name: track_name(raw.name),
        },
        Err(e) => {
            debug!(error = %e, "Skipping unreadable track record");
            PlayEvent::new(String::new(), None)
        }
    }
}

// Names are informational; any JSON shape is accepted.
fn track_name(raw: Option<Value>) -> String {
    match raw {
        Some(Value::String(name)) => name,
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
