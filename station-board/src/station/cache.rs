//! Per-station cache of the last fetched arrivals or departures.
//!
//! Each station has a single cache entry that holds either arrivals or
//! departures, never both. Reading narrows the cached list to the requested
//! window and writes the narrowed list back, so the entry shrinks as the
//! window moves forward during the day. Trimming does not reset the entry's
//! creation time, so freshness still runs out on schedule.

use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, TimeZone};
use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheError, CachePayload, CacheStore};
use crate::domain::{EventKind, EventRecord, format_hms};

/// Cache key for a station's entry.
///
/// # Examples
///
/// ```
/// use station_board::station::station_cache_key;
///
/// assert_eq!(station_cache_key("rmv", "3011005"), "rmv/3011005/last-result.json");
/// ```
pub fn station_cache_key(identifier: &str, station_id: &str) -> String {
    format!("{identifier}/{station_id}/last-result.json")
}

/// The typed contents of a station's cache entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationInfos {
    Arrivals(Vec<EventRecord>),
    Departures(Vec<EventRecord>),
}

impl StationInfos {
    pub fn new(kind: EventKind, records: Vec<EventRecord>) -> Self {
        match kind {
            EventKind::Arrival => StationInfos::Arrivals(records),
            EventKind::Departure => StationInfos::Departures(records),
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            StationInfos::Arrivals(_) => EventKind::Arrival,
            StationInfos::Departures(_) => EventKind::Departure,
        }
    }

    pub fn into_records(self) -> Vec<EventRecord> {
        match self {
            StationInfos::Arrivals(records) | StationInfos::Departures(records) => records,
        }
    }

    /// Decode an entry payload. Unknown subjects and undecodable data yield `None`.
    fn from_payload(payload: &CachePayload) -> Option<Self> {
        let kind = match payload.subject.as_str() {
            s if s == EventKind::Arrival.subject() => EventKind::Arrival,
            s if s == EventKind::Departure.subject() => EventKind::Departure,
            _ => return None,
        };
        let records = serde_json::from_value(payload.data.clone()).ok()?;
        Some(Self::new(kind, records))
    }
}

/// Reads and writes one station's cached infos.
pub struct StationInfoCache {
    store: Arc<dyn CacheStore>,
    entry: CacheEntry,
}

impl StationInfoCache {
    /// Load (or create) the entry for `station_id` of the data source
    /// `identifier`. New entries stay valid for `valid_for_seconds`.
    pub fn new(
        store: Arc<dyn CacheStore>,
        identifier: &str,
        station_id: &str,
        valid_for_seconds: u64,
    ) -> Self {
        let entry = store.get_or_create_entry(&station_cache_key(identifier, station_id), valid_for_seconds);
        Self { store, entry }
    }

    /// The underlying cache entry.
    pub fn entry(&self) -> &CacheEntry {
        &self.entry
    }

    /// Cached arrivals within `start..=end`, or `None` on a cache miss.
    pub fn arrivals<Z: TimeZone>(
        &mut self,
        reference: &DateTime<Z>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Option<Vec<EventRecord>>, CacheError> {
        self.infos(EventKind::Arrival, reference, start, end)
    }

    /// Cached departures within `start..=end`, or `None` on a cache miss.
    pub fn departures<Z: TimeZone>(
        &mut self,
        reference: &DateTime<Z>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Option<Vec<EventRecord>>, CacheError> {
        self.infos(EventKind::Departure, reference, start, end)
    }

    /// Replace the cached infos with `records` as arrivals fetched at `reference`.
    pub fn set_arrivals<Z: TimeZone>(
        &mut self,
        reference: &DateTime<Z>,
        records: &[EventRecord],
    ) -> Result<(), CacheError> {
        self.set_infos(EventKind::Arrival, reference, records)
    }

    /// Replace the cached infos with `records` as departures fetched at `reference`.
    pub fn set_departures<Z: TimeZone>(
        &mut self,
        reference: &DateTime<Z>,
        records: &[EventRecord],
    ) -> Result<(), CacheError> {
        self.set_infos(EventKind::Departure, reference, records)
    }

    /// Cached infos of `kind` within `start..=end`.
    ///
    /// Returns `Ok(None)` if the entry holds the other kind, has expired, or
    /// cannot be decoded. A hit with no events in the window is `Ok(Some(vec![]))`.
    /// Records outside the window are dropped from the entry and the entry
    /// is saved right away.
    pub fn infos<Z: TimeZone>(
        &mut self,
        kind: EventKind,
        reference: &DateTime<Z>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Option<Vec<EventRecord>>, CacheError> {
        if !self.entry.is_for(kind.subject()) || !self.entry.is_valid(reference) {
            return Ok(None);
        }

        let Some(infos) = self.entry.payload().and_then(StationInfos::from_payload) else {
            warn!(entry = %self.entry.name(), "Undecodable station infos in cache, refetching");
            return Ok(None);
        };

        let (start, end) = window_bounds(start, end);

        let records = infos.into_records();
        let cached = records.len();
        let kept: Vec<EventRecord> = records
            .into_iter()
            .filter(|r| r.time >= start && r.time <= end)
            .collect();

        if kept.len() < cached {
            debug!(
                entry = %self.entry.name(),
                dropped = cached - kept.len(),
                kept = kept.len(),
                "Trimming cached station infos"
            );
            self.entry.replace_data(serde_json::to_value(&kept)?);
            self.entry.save(self.store.as_ref())?;
        }

        Ok(Some(kept))
    }

    /// Replace the cached infos and persist them.
    pub fn set_infos<Z: TimeZone>(
        &mut self,
        kind: EventKind,
        reference: &DateTime<Z>,
        records: &[EventRecord],
    ) -> Result<(), CacheError> {
        self.entry
            .set_payload(kind.subject(), serde_json::to_value(records)?);
        self.entry.set_created_at(reference);
        self.entry.save(self.store.as_ref())
    }
}

/// The window as `H:i:s` strings comparable with record times.
///
/// An end on a later day than the start (a "24:00" bound) covers the rest
/// of the start day.
fn window_bounds(start: NaiveDateTime, end: NaiveDateTime) -> (String, String) {
    let end = if end.date() > start.date() {
        END_OF_DAY_HMS.to_string()
    } else {
        format_hms(end.time())
    };
    (format_hms(start.time()), end)
}

/// Sorts after every `H:i:s` record time.
const END_OF_DAY_HMS: &str = "24:00:00";
