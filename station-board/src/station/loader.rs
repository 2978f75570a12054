//! Cache-or-fetch loading of a single station's infos.

use chrono::{DateTime, NaiveDateTime, TimeZone};
use tracing::debug;

use crate::domain::{EventKind, EventRecord, StationEvent};

use super::cache::StationInfoCache;
use super::error::StationError;

/// Source of live station events.
///
/// This abstraction allows the loader to be tested without network access.
pub trait StationInfoFetcher: Send {
    /// Arrivals between `start` and `end` (local wall-clock times).
    fn fetch_arrivals(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<StationEvent>, StationError>;

    /// Departures between `start` and `end` (local wall-clock times).
    fn fetch_departures(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<StationEvent>, StationError>;

    fn fetch(
        &self,
        kind: EventKind,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<StationEvent>, StationError> {
        match kind {
            EventKind::Arrival => self.fetch_arrivals(start, end),
            EventKind::Departure => self.fetch_departures(start, end),
        }
    }
}

/// Loads a station's arrivals or departures, serving from its cache entry
/// while that is valid and fetching otherwise.
pub struct StationInfoLoader {
    cache: StationInfoCache,
    fetcher: Box<dyn StationInfoFetcher>,
}

impl StationInfoLoader {
    pub fn new(cache: StationInfoCache, fetcher: Box<dyn StationInfoFetcher>) -> Self {
        Self { cache, fetcher }
    }

    pub fn load_arrivals<Z: TimeZone>(
        &mut self,
        reference: &DateTime<Z>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<EventRecord>, StationError> {
        self.load(EventKind::Arrival, reference, start, end)
    }

    pub fn load_departures<Z: TimeZone>(
        &mut self,
        reference: &DateTime<Z>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<EventRecord>, StationError> {
        self.load(EventKind::Departure, reference, start, end)
    }

    /// Records of `kind` between `start` and `end`.
    ///
    /// An inverted window (`end < start`) yields nothing without touching
    /// the cache or the fetcher. On a miss the fetched records are written
    /// to the cache before they are returned.
    pub fn load<Z: TimeZone>(
        &mut self,
        kind: EventKind,
        reference: &DateTime<Z>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<EventRecord>, StationError> {
        if end < start {
            return Ok(Vec::new());
        }

        if let Some(records) = self.cache.infos(kind, reference, start, end)? {
            debug!(entry = %self.cache.entry().name(), %kind, count = records.len(), "Cache hit");
            return Ok(records);
        }

        let events = self.fetcher.fetch(kind, start, end)?;
        let records: Vec<EventRecord> = events.iter().map(StationEvent::to_record).collect();
        debug!(entry = %self.cache.entry().name(), %kind, count = records.len(), "Fetched station infos");

        self.cache.set_infos(kind, reference, &records)?;
        Ok(records)
    }
}
