//! Conversion from RMV DTOs to station events.

use chrono::{DateTime, NaiveDateTime};
use chrono_tz::Tz;
use tracing::warn;

use crate::domain::{EventKind, StationEvent, VehicleType, localize};

use super::types::{BoardItem, BoardResponse};

/// Error during DTO to event conversion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// Failed to parse a date or time string
    #[error("invalid time: {0}")]
    InvalidTime(String),

    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Convert the arrivals or departures of a board response to events.
///
/// Items that cannot be converted are logged and skipped.
pub fn convert_board(
    response: &BoardResponse,
    kind: EventKind,
    vehicle_type: VehicleType,
    tz: Tz,
) -> Vec<StationEvent> {
    let items = match kind {
        EventKind::Arrival => &response.arrivals,
        EventKind::Departure => &response.departures,
    };

    let mut events = Vec::with_capacity(items.len());
    for item in items {
        match convert_item(item, kind, vehicle_type, tz) {
            Ok(event) => events.push(event),
            Err(e) => {
                warn!(
                    journey = item.name.as_deref().unwrap_or("?"),
                    error = %e,
                    "Skipping board item"
                );
            }
        }
    }

    events
}

/// Convert a single board item.
///
/// Arrivals come from `origin` to the board's `stop`, departures go from the
/// `stop` towards `direction`.
pub fn convert_item(
    item: &BoardItem,
    kind: EventKind,
    vehicle_type: VehicleType,
    tz: Tz,
) -> Result<StationEvent, ConversionError> {
    let date = item.date.as_deref().ok_or(ConversionError::MissingField("date"))?;
    let time = item.time.as_deref().ok_or(ConversionError::MissingField("time"))?;
    let planned = parse_date_time(date, time, tz)?;

    // Real time only when both parts are present
    let real_time = match (item.rt_date.as_deref(), item.rt_time.as_deref()) {
        (Some(rt_date), Some(rt_time)) => parse_date_time(rt_date, rt_time, tz)?,
        _ => planned,
    };

    let line = item
        .first_product()
        .and_then(|p| p.line.clone())
        .ok_or(ConversionError::MissingField("Product.line"))?;

    let stop = item.stop.clone().ok_or(ConversionError::MissingField("stop"))?;

    let (departure_station_name, arrival_station_name) = match kind {
        EventKind::Arrival => {
            let origin = item.origin.clone().ok_or(ConversionError::MissingField("origin"))?;
            (origin, stop)
        }
        EventKind::Departure => {
            let direction = item
                .direction
                .clone()
                .ok_or(ConversionError::MissingField("direction"))?;
            (stop, direction)
        }
    };

    Ok(StationEvent {
        time: planned,
        real_time,
        line,
        departure_station_name,
        arrival_station_name,
        kind,
        vehicle_type,
    })
}

/// Parse "YYYY-MM-DD" and "HH:MM:SS" as a local time in `tz`.
fn parse_date_time(date: &str, time: &str, tz: Tz) -> Result<DateTime<Tz>, ConversionError> {
    let invalid = || ConversionError::InvalidTime(format!("{date} {time}"));
    let naive = NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M:%S")
        .map_err(|_| invalid())?;
    localize(tz, naive).map_err(|_| invalid())
}
