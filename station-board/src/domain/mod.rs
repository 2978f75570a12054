//! Domain types for the station board.
//!
//! This module contains the value types shared by the schedule, cache and
//! station layers. Types that parse configuration strings validate them at
//! construction time.

mod duration;
mod error;
mod event;
mod time;

pub use duration::{DurationError, parse_duration};
pub use error::DomainError;
pub use event::{EventKind, EventRecord, StationEvent, VehicleType};
pub use time::{ClockTime, TimeError, format_hms, localize};
