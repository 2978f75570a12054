//! Time-of-day logic for the board.
//!
//! [`DisplayModeSelector`] decides whether arrivals or departures are shown,
//! and [`RelativeTimeSpan`] computes the window of events to show around the
//! reference time.

mod display_mode;
mod time_span;

pub use display_mode::{DisplayMode, DisplayModeSelector};
pub use time_span::RelativeTimeSpan;
