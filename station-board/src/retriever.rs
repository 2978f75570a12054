//! Collecting arrivals and departures across all configured stations.

use chrono::DateTime;
use chrono_tz::Tz;

use crate::config::{ConfigError, StationInfoConfig};
use crate::domain::{EventKind, EventRecord, VehicleType};
use crate::schedule::RelativeTimeSpan;
use crate::station::{StationError, StationInfoLoader, StationInfoLoaderFactory};

/// Asks every station loader for the records inside the current window.
pub struct DataRetriever {
    arrival_span: RelativeTimeSpan,
    departure_span: RelativeTimeSpan,
    loaders: Vec<StationInfoLoader>,
}

impl DataRetriever {
    pub fn new(arrival_span: RelativeTimeSpan, departure_span: RelativeTimeSpan) -> Self {
        Self {
            arrival_span,
            departure_span,
            loaders: Vec::new(),
        }
    }

    pub fn add_loader(&mut self, loader: StationInfoLoader) {
        self.loaders.push(loader);
    }

    pub fn station_count(&self) -> usize {
        self.loaders.len()
    }

    /// Create a loader for every configured station.
    ///
    /// Station lists are keyed by vehicle type name, matched case-insensitively.
    pub fn add_stations(
        &mut self,
        config: &StationInfoConfig,
        factory: &dyn StationInfoLoaderFactory,
    ) -> Result<(), ConfigError> {
        for (vehicle_type, station_ids) in &config.stations {
            let vehicle_type: VehicleType = vehicle_type.parse()?;
            for station_id in station_ids {
                self.loaders
                    .push(factory.create_loader(station_id, vehicle_type, &config.ignore_lines));
            }
        }
        Ok(())
    }

    pub fn retrieve_arrivals(&mut self, reference: &DateTime<Tz>) -> Result<Vec<EventRecord>, StationError> {
        self.retrieve(EventKind::Arrival, reference)
    }

    pub fn retrieve_departures(&mut self, reference: &DateTime<Tz>) -> Result<Vec<EventRecord>, StationError> {
        self.retrieve(EventKind::Departure, reference)
    }

    /// Records of `kind` from all stations, in loader order.
    ///
    /// The window is computed on the reference's local wall-clock time.
    pub fn retrieve(
        &mut self,
        kind: EventKind,
        reference: &DateTime<Tz>,
    ) -> Result<Vec<EventRecord>, StationError> {
        let span = match kind {
            EventKind::Arrival => &self.arrival_span,
            EventKind::Departure => &self.departure_span,
        };
        let local = reference.naive_local();
        let start = span.start_time(local);
        let end = span.end_time(local);

        let mut records = Vec::new();
        for loader in &mut self.loaders {
            records.extend(loader.load(kind, reference, start, end)?);
        }
        Ok(records)
    }
}
