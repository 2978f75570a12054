//! Query windows relative to a reference time.

use chrono::{Duration, NaiveDateTime};

use crate::config::{ConfigError, TimeSpanConfig};
use crate::domain::{ClockTime, parse_duration};

/// A window reaching `past` before and `future` after a reference time,
/// clamped to the clock times `minimum..=maximum` of the reference date.
///
/// Window endpoints are local wall-clock times. When the reference time lies
/// so far outside the bounds that the whole window does, both endpoints
/// collapse onto the nearest bound; callers treat `end < start` as an empty
/// window.
///
/// # Examples
///
/// ```
/// use station_board::domain::ClockTime;
/// use station_board::schedule::RelativeTimeSpan;
/// use chrono::{Duration, NaiveDate};
///
/// let span = RelativeTimeSpan::new(
///     Duration::minutes(65),
///     Duration::minutes(140),
///     ClockTime::parse("08:00").unwrap(),
///     ClockTime::parse("18:00").unwrap(),
/// );
/// let date = NaiveDate::from_ymd_opt(2019, 5, 6).unwrap();
/// let reference = date.and_hms_opt(13, 0, 0).unwrap();
///
/// assert_eq!(span.start_time(reference), date.and_hms_opt(11, 55, 0).unwrap());
/// assert_eq!(span.end_time(reference), date.and_hms_opt(15, 20, 0).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelativeTimeSpan {
    past: Duration,
    future: Duration,
    minimum: ClockTime,
    maximum: ClockTime,
}

impl RelativeTimeSpan {
    /// Create a time span from its parts.
    pub fn new(past: Duration, future: Duration, minimum: ClockTime, maximum: ClockTime) -> Self {
        Self {
            past,
            future,
            minimum,
            maximum,
        }
    }

    /// Create a time span from configuration, falling back to defaults for
    /// unset keys.
    pub fn from_config(config: &TimeSpanConfig) -> Result<Self, ConfigError> {
        let default = Self::default();

        let past = match &config.past {
            Some(s) => parse_duration(s).map_err(|source| ConfigError::Duration { key: "past", source })?,
            None => default.past,
        };
        let future = match &config.future {
            Some(s) => parse_duration(s).map_err(|source| ConfigError::Duration { key: "future", source })?,
            None => default.future,
        };
        let minimum = match &config.min {
            Some(s) => ClockTime::parse(s).map_err(|source| ConfigError::Time { key: "min", source })?,
            None => default.minimum,
        };
        let maximum = match &config.max {
            Some(s) => ClockTime::parse(s).map_err(|source| ConfigError::Time { key: "max", source })?,
            None => default.maximum,
        };

        Ok(Self::new(past, future, minimum, maximum))
    }

    /// Start of the window: `reference - past`, clamped to the bounds.
    pub fn start_time(&self, reference: NaiveDateTime) -> NaiveDateTime {
        let (minimum, maximum) = self.bounds(reference);
        let start = reference - self.past;

        if start < minimum {
            minimum
        } else if start > maximum {
            maximum
        } else {
            start
        }
    }

    /// End of the window: `reference + future`, clamped to the bounds.
    pub fn end_time(&self, reference: NaiveDateTime) -> NaiveDateTime {
        let (minimum, maximum) = self.bounds(reference);
        let end = reference + self.future;

        if end > maximum {
            maximum
        } else if end < minimum {
            minimum
        } else {
            end
        }
    }

    /// The configured bounds placed on the reference date.
    fn bounds(&self, reference: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
        let date = reference.date();
        (self.minimum.on(date), self.maximum.on(date))
    }
}

impl Default for RelativeTimeSpan {
    fn default() -> Self {
        Self {
            past: Duration::zero(),
            future: Duration::zero(),
            minimum: ClockTime::MIDNIGHT,
            maximum: ClockTime::LAST_MINUTE,
        }
    }
}
