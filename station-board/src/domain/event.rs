//! Arrival and departure events.

use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::DomainError;
use super::time::format_hms;

/// Whether an event is an arrival or a departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Arrival,
    Departure,
}

impl EventKind {
    /// Subject tag under which events of this kind are cached.
    pub fn subject(&self) -> &'static str {
        match self {
            EventKind::Arrival => "arrivals",
            EventKind::Departure => "departures",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Arrival => write!(f, "arrival"),
            EventKind::Departure => write!(f, "departure"),
        }
    }
}

/// The kind of vehicle serving a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Train,
    Bus,
}

impl FromStr for VehicleType {
    type Err = DomainError;

    /// Parse a vehicle type name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "train" => Ok(VehicleType::Train),
            "bus" => Ok(VehicleType::Bus),
            _ => Err(DomainError::InvalidVehicleType(s.to_string())),
        }
    }
}

/// One arrival or departure at a station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationEvent {
    /// Planned time.
    pub time: DateTime<Tz>,
    /// Predicted time; equal to `time` when no real-time data exists.
    pub real_time: DateTime<Tz>,
    /// Line name, e.g. "RB40".
    pub line: String,
    /// Where the vehicle comes from (arrivals) or the station itself (departures).
    pub departure_station_name: String,
    /// The station itself (arrivals) or where the vehicle goes (departures).
    pub arrival_station_name: String,
    pub kind: EventKind,
    pub vehicle_type: VehicleType,
}

impl StationEvent {
    /// Difference between predicted and planned time. Negative when early.
    pub fn delay(&self) -> Duration {
        self.real_time.signed_duration_since(self.time)
    }

    /// Convert to the normalized record that is cached and served.
    pub fn to_record(&self) -> EventRecord {
        let delay_secs = self.delay().num_seconds();
        EventRecord {
            line: self.line.clone(),
            time: format_hms(self.time.time()),
            real_time: format_hms(self.real_time.time()),
            delay: (delay_secs as f64 / 60.0).round() as i64,
            arrival_station_name: self.arrival_station_name.clone(),
            departure_station_name: self.departure_station_name.clone(),
            event_type: self.kind,
            vehicle_type: self.vehicle_type,
        }
    }
}

/// The normalized form of a `StationEvent`.
///
/// Times are local "HH:MM:SS" strings so that records compare and sort by
/// plain string comparison within a single day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub line: String,
    pub time: String,
    pub real_time: String,
    /// Delay in whole minutes, rounded.
    pub delay: i64,
    pub arrival_station_name: String,
    pub departure_station_name: String,
    pub event_type: EventKind,
    pub vehicle_type: VehicleType,
}
