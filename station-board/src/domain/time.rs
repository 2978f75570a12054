//! Time-of-day handling for board configuration.
//!
//! Board boundaries are configured as "HH:MM" strings without a date. The
//! display window may end at "24:00", which a `NaiveTime` cannot represent,
//! so clock times are kept as an offset from midnight instead.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike};
use chrono_tz::Tz;
use std::fmt;

/// Error returned when parsing an invalid time string or resolving a local time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A time of day between 00:00 and 24:00 inclusive.
///
/// # Examples
///
/// ```
/// use station_board::domain::ClockTime;
///
/// let t = ClockTime::parse("7:30").unwrap();
/// assert_eq!(t.to_string(), "07:30");
///
/// assert!(ClockTime::parse("24:00").is_ok());
/// assert!(ClockTime::parse("24:01").is_err());
/// assert!(ClockTime::parse("12:5").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    since_midnight: Duration,
}

impl ClockTime {
    /// Midnight at the start of the day.
    pub const MIDNIGHT: Self = Self {
        since_midnight: Duration::zero(),
    };

    pub const NOON: Self = Self {
        since_midnight: Duration::hours(12),
    };

    /// "23:59".
    pub const LAST_MINUTE: Self = Self {
        since_midnight: Duration::minutes(23 * 60 + 59),
    };

    /// The last instant of the day ("24:00").
    pub const END_OF_DAY: Self = Self {
        since_midnight: Duration::hours(24),
    };

    /// Create a clock time from hours and minutes.
    ///
    /// Returns `None` unless `hour:minute` lies within 00:00..=24:00.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if minute > 59 || hour > 24 || (hour == 24 && minute != 0) {
            return None;
        }
        Some(Self {
            since_midnight: Duration::minutes(i64::from(hour * 60 + minute)),
        })
    }

    /// Parse "H:MM" or "HH:MM".
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let (hour, minute) = s
            .split_once(':')
            .ok_or_else(|| TimeError::new("expected HH:MM format"))?;

        if hour.is_empty() || hour.len() > 2 {
            return Err(TimeError::new("hour must have one or two digits"));
        }
        if minute.len() != 2 {
            return Err(TimeError::new("minute must have two digits"));
        }

        let hour = parse_digits(hour).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        let minute = parse_digits(minute).ok_or_else(|| TimeError::new("invalid minute digits"))?;

        Self::from_hm(hour, minute).ok_or_else(|| TimeError::new("time must be 00:00-24:00"))
    }

    /// The clock time of a `NaiveTime`, keeping sub-second precision.
    pub fn of(time: NaiveTime) -> Self {
        let secs = i64::from(time.num_seconds_from_midnight());
        let nanos = i64::from(time.nanosecond());
        Self {
            since_midnight: Duration::seconds(secs) + Duration::nanoseconds(nanos),
        }
    }

    /// Offset from midnight.
    pub fn since_midnight(&self) -> Duration {
        self.since_midnight
    }

    /// Place this clock time on a date. "24:00" becomes midnight of the next day.
    pub fn on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(NaiveTime::MIN) + self.since_midnight
    }

    fn hour(&self) -> i64 {
        self.since_midnight.num_minutes() / 60
    }

    fn minute(&self) -> i64 {
        self.since_midnight.num_minutes() % 60
    }
}

impl fmt::Debug for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClockTime({:02}:{:02})", self.hour(), self.minute())
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Parse a run of ASCII digits into a u32.
fn parse_digits(s: &str) -> Option<u32> {
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Resolve a wall-clock time in the given zone.
///
/// Ambiguous times (clocks going back) resolve to the earlier instant. Times
/// inside a gap (clocks going forward) are moved forward by one hour.
pub fn localize(tz: Tz, naive: NaiveDateTime) -> Result<DateTime<Tz>, TimeError> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(t) => Ok(t),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .ok_or_else(|| TimeError::new("local time does not exist")),
    }
}

/// Format a time of day the way board records store it ("HH:MM:SS").
pub fn format_hms(time: NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Europe::Berlin;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn parse_valid_times() {
        assert_eq!(ClockTime::parse("00:00").unwrap(), ClockTime::MIDNIGHT);
        assert_eq!(ClockTime::parse("0:00").unwrap(), ClockTime::MIDNIGHT);
        assert_eq!(ClockTime::parse("24:00").unwrap(), ClockTime::END_OF_DAY);
        assert_eq!(ClockTime::parse("12:00").unwrap(), ClockTime::NOON);
        assert_eq!(ClockTime::parse("23:59").unwrap(), ClockTime::LAST_MINUTE);
        assert_eq!(
            ClockTime::parse("11:10").unwrap(),
            ClockTime::from_hm(11, 10).unwrap()
        );
    }

    #[test]
    fn parse_invalid_format() {
        assert!(ClockTime::parse("").is_err());
        assert!(ClockTime::parse("1430").is_err());
        assert!(ClockTime::parse("14:3").is_err());
        assert!(ClockTime::parse("14:300").is_err());
        assert!(ClockTime::parse("114:30").is_err());
        assert!(ClockTime::parse(":30").is_err());
        assert!(ClockTime::parse("ab:cd").is_err());
        assert!(ClockTime::parse("1a:30").is_err());
    }

    #[test]
    fn parse_invalid_values() {
        assert!(ClockTime::parse("25:00").is_err());
        assert!(ClockTime::parse("24:01").is_err());
        assert!(ClockTime::parse("12:60").is_err());
    }

    #[test]
    fn display_format() {
        assert_eq!(ClockTime::parse("7:05").unwrap().to_string(), "07:05");
        assert_eq!(ClockTime::END_OF_DAY.to_string(), "24:00");
    }

    #[test]
    fn of_keeps_subsecond_precision() {
        let switch = ClockTime::from_hm(11, 0).unwrap();
        let just_before = NaiveTime::from_hms_milli_opt(10, 59, 59, 999).unwrap();
        assert!(ClockTime::of(just_before) < switch);
        assert_eq!(ClockTime::of(hms(11, 0, 0)), switch);
        assert!(ClockTime::of(hms(23, 59, 59)) < ClockTime::END_OF_DAY);
    }

    #[test]
    fn on_places_time_on_date() {
        let d = date(2024, 3, 15);
        let t = ClockTime::from_hm(8, 30).unwrap().on(d);
        assert_eq!(t, d.and_time(hms(8, 30, 0)));

        let end = ClockTime::END_OF_DAY.on(d);
        assert_eq!(end, date(2024, 3, 16).and_time(NaiveTime::MIN));
    }

    #[test]
    fn localize_regular_time() {
        let naive = date(2024, 5, 6).and_time(hms(10, 0, 0));
        let t = localize(Berlin, naive).unwrap();
        assert_eq!(t.naive_local(), naive);
        assert_eq!(t.naive_utc(), date(2024, 5, 6).and_time(hms(8, 0, 0)));
    }

    #[test]
    fn localize_ambiguous_time_takes_earliest() {
        // Clocks go back from 03:00 CEST to 02:00 CET on 2024-10-27
        let naive = date(2024, 10, 27).and_time(hms(2, 30, 0));
        let t = localize(Berlin, naive).unwrap();
        assert_eq!(t.naive_utc(), date(2024, 10, 27).and_time(hms(0, 30, 0)));
    }

    #[test]
    fn localize_gap_moves_forward() {
        // Clocks jump from 02:00 CET to 03:00 CEST on 2024-03-31
        let naive = date(2024, 3, 31).and_time(hms(2, 30, 0));
        let t = localize(Berlin, naive).unwrap();
        assert_eq!(t.naive_local(), date(2024, 3, 31).and_time(hms(3, 30, 0)));
    }

    #[test]
    fn format_hms_pads() {
        assert_eq!(format_hms(hms(7, 4, 9)), "07:04:09");
    }
}
