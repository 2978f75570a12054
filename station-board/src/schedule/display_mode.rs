//! Choosing between the arrival and departure board by time of day.

use chrono::NaiveTime;
use serde::Serialize;

use crate::config::{ConfigError, DisplayTimeSpanConfig};
use crate::domain::ClockTime;

/// What the board shows at a given time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Outside the display window; the board is empty.
    None,
    Arrival,
    Departure,
}

/// Maps a time of day to a display mode.
///
/// Arrivals are shown from `start` until just before `mode_switch`,
/// departures from `mode_switch` through `end` inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayModeSelector {
    start: ClockTime,
    mode_switch: ClockTime,
    end: ClockTime,
}

impl DisplayModeSelector {
    /// Create a selector from its boundaries.
    pub fn new(start: ClockTime, mode_switch: ClockTime, end: ClockTime) -> Self {
        Self {
            start,
            mode_switch,
            end,
        }
    }

    /// Create a selector from configuration, falling back to defaults for
    /// unset keys.
    pub fn from_config(config: &DisplayTimeSpanConfig) -> Result<Self, ConfigError> {
        let default = Self::default();
        let parse = |value: &Option<String>, key: &'static str, fallback: ClockTime| match value {
            Some(s) => ClockTime::parse(s).map_err(|source| ConfigError::Time { key, source }),
            None => Ok(fallback),
        };

        Ok(Self::new(
            parse(&config.start, "start", default.start)?,
            parse(&config.mode_switch, "modeSwitch", default.mode_switch)?,
            parse(&config.end, "end", default.end)?,
        ))
    }

    /// The display mode for a local time of day.
    pub fn display_mode(&self, time: NaiveTime) -> DisplayMode {
        let time = ClockTime::of(time);

        if time < self.start || time > self.end {
            DisplayMode::None
        } else if time < self.mode_switch {
            DisplayMode::Arrival
        } else {
            DisplayMode::Departure
        }
    }
}

impl Default for DisplayModeSelector {
    fn default() -> Self {
        Self {
            start: ClockTime::MIDNIGHT,
            mode_switch: ClockTime::NOON,
            end: ClockTime::END_OF_DAY,
        }
    }
}
