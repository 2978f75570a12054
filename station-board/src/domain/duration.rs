//! Parsing of "hours:minutes" duration strings.
//!
//! Time spans in the board configuration are written as `H:M`, e.g. `"1:05"`
//! for one hour and five minutes. Both parts are plain digit runs of any
//! length, so `"0:90"` is a valid way of writing ninety minutes.

use chrono::Duration;

/// Error returned when a duration string is not in `H:M` format.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DurationError {
    /// The string does not match `^\d+:\d+$`.
    #[error("invalid duration {0:?}: expected hours:minutes")]
    InvalidFormat(String),
}

/// Parse an `H:M` string into a duration of `hours * 60 + minutes` minutes.
///
/// # Examples
///
/// ```
/// use station_board::domain::parse_duration;
/// use chrono::Duration;
///
/// assert_eq!(parse_duration("2:4").unwrap(), Duration::minutes(124));
/// assert_eq!(parse_duration("0:10").unwrap(), Duration::minutes(10));
/// assert!(parse_duration("5:").is_err());
/// ```
pub fn parse_duration(s: &str) -> Result<Duration, DurationError> {
    let invalid = || DurationError::InvalidFormat(s.to_string());

    let (hours, minutes) = s.split_once(':').ok_or_else(invalid)?;
    let hours = parse_digits(hours).ok_or_else(invalid)?;
    let minutes = parse_digits(minutes).ok_or_else(invalid)?;

    let total = hours
        .checked_mul(60)
        .and_then(|h| h.checked_add(minutes))
        .ok_or_else(invalid)?;

    Duration::try_minutes(total).ok_or_else(invalid)
}

/// Parse a non-empty run of ASCII digits.
fn parse_digits(s: &str) -> Option<i64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any pair of small numbers formats and parses back to the same minute count
        #[test]
        fn hours_and_minutes_add_up(h in 0i64..1000, m in 0i64..1000) {
            let parsed = parse_duration(&format!("{h}:{m}")).unwrap();
            prop_assert_eq!(parsed, Duration::minutes(h * 60 + m));
        }

        /// Strings without a colon are always rejected
        #[test]
        fn colon_required(s in "[0-9a-z]{0,8}") {
            prop_assert!(parse_duration(&s).is_err());
        }
    }
}
