//! Daily play count aggregation over a user's recent plays.

use crate::play_event::PlayEvent;
use crate::traits::{FetchOptions, PlayHistorySource};
use crate::types::{Field, SeriesTable, PLAYS_FIELD, TIME_FIELD};
use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone};
use sgraph_common::{RefId, Result, UserName};
use sgraph_config::DayKeying;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// The value plays are grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayKey {
    /// Full calendar date.
    Date(NaiveDate),
    /// Month and day of month, any year.
    MonthDay {
        /// Month, 1-12.
        month: u32,
        /// Day of month, 1-31.
        day: u32,
    },
}

impl DayKey {
    /// Key for `instant` under `keying`, read off the instant's own calendar.
    pub fn of<Tz: TimeZone>(instant: &DateTime<Tz>, keying: DayKeying) -> Self {
        match keying {
            DayKeying::CalendarDate => Self::Date(instant.date_naive()),
            DayKeying::DayOfMonth => Self::MonthDay {
                month: instant.month(),
                day: instant.day(),
            },
        }
    }
}

/// One day's worth of plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBucket {
    /// Epoch milliseconds of the first play seen for this day.
    pub representative_ms: i64,
    /// Plays on this day, at least one.
    pub count: u32,
}

/// Groups plays into day buckets in order of first occurrence.
///
/// Events without a representable timestamp are skipped.
pub fn bucket_plays<Tz: TimeZone>(
    events: &[PlayEvent],
    timezone: &Tz,
    keying: DayKeying,
) -> Vec<DayBucket> {
    let mut index: HashMap<DayKey, usize> = HashMap::new();
    let mut buckets: Vec<DayBucket> = Vec::new();

    for local in events.iter().filter_map(|e| e.played_at_in(timezone)) {
        match index.entry(DayKey::of(&local, keying)) {
            Entry::Occupied(slot) => buckets[*slot.get()].count += 1,
            Entry::Vacant(slot) => {
                slot.insert(buckets.len());
                buckets.push(DayBucket {
                    representative_ms: local.timestamp_millis(),
                    count: 1,
                });
            }
        }
    }

    buckets
}

/// Emits buckets as `Time` / `Plays` columns, preserving bucket order.
pub fn buckets_to_table(ref_id: RefId, buckets: &[DayBucket]) -> SeriesTable {
    let (times, plays): (Vec<i64>, Vec<f64>) = buckets
        .iter()
        .map(|b| (b.representative_ms, f64::from(b.count)))
        .unzip();
    SeriesTable::from_aligned(
        ref_id,
        vec![Field::time(TIME_FIELD, times), Field::number(PLAYS_FIELD, plays)],
    )
}

/// Fetches a user's recent plays and counts them per day.
#[derive(Debug)]
pub struct PlayHistoryAggregator<S, Tz: TimeZone = Local> {
    source: S,
    timezone: Tz,
    keying: DayKeying,
}

impl<S: PlayHistorySource> PlayHistoryAggregator<S, Local> {
    /// Aggregator bucketing on the process's local calendar.
    pub fn new(source: S, keying: DayKeying) -> Self {
        Self {
            source,
            timezone: Local,
            keying,
        }
    }
}

impl<S: PlayHistorySource, Tz: TimeZone> PlayHistoryAggregator<S, Tz> {
    /// Buckets on `timezone`'s calendar instead of the local one.
    pub fn with_timezone<Tz2: TimeZone>(self, timezone: Tz2) -> PlayHistoryAggregator<S, Tz2> {
        PlayHistoryAggregator {
            source: self.source,
            timezone,
            keying: self.keying,
        }
    }

    /// The active day keying.
    pub fn keying(&self) -> DayKeying {
        self.keying
    }

    /// Aggregates already-fetched events.
    pub fn aggregate(&self, ref_id: RefId, events: &[PlayEvent]) -> SeriesTable {
        let buckets = bucket_plays(events, &self.timezone, self.keying);
        debug!(
            events = events.len(),
            buckets = buckets.len(),
            "Aggregated daily play counts"
        );
        buckets_to_table(ref_id, &buckets)
    }

    /// One fetch for `user`, then the day series.
    #[instrument(skip(self, ref_id, user, options), fields(ref_id = %ref_id, user = %user))]
    pub async fn daily_play_counts(
        &self,
        ref_id: RefId,
        user: &UserName,
        options: &FetchOptions,
    ) -> Result<SeriesTable> {
        let events = self.source.fetch_recent_plays(user, options).await?;
        let table = self.aggregate(ref_id, &events);
        info!(days = table.len(), "Built daily play count series");
        Ok(table)
    }
}
