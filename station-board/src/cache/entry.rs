//! A single named, expiring unit of cached data.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::CacheError;
use super::store::CacheStore;

/// Cached data together with the subject tag describing what it is.
///
/// Subject and data are always set together, so an entry can never claim to
/// hold arrivals while carrying some other payload's data.
#[derive(Debug, Clone, PartialEq)]
pub struct CachePayload {
    pub subject: String,
    pub data: Value,
}

/// The persisted form of a cache entry.
///
/// ```json
/// {"createTimestamp": 1557136800, "validForSeconds": 300, "data": [], "for": "arrivals"}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredEntry {
    /// Unix seconds.
    #[serde(default)]
    pub create_timestamp: Option<i64>,
    #[serde(default)]
    pub valid_for_seconds: Option<u64>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default, rename = "for")]
    pub subject: Option<String>,
}

/// A named cache entry.
///
/// Mutators only change the in-memory state; call [`CacheEntry::save`] to
/// persist it.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    name: String,
    valid_for_seconds: Option<u64>,
    created_at: Option<DateTime<Utc>>,
    payload: Option<CachePayload>,
}

impl CacheEntry {
    /// An empty entry with only its name set.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            valid_for_seconds: None,
            created_at: None,
            payload: None,
        }
    }

    /// The entry's key within its store.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn valid_for_seconds(&self) -> Option<u64> {
        self.valid_for_seconds
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn payload(&self) -> Option<&CachePayload> {
        self.payload.as_ref()
    }

    pub fn set_valid_for_seconds(&mut self, seconds: u64) {
        self.valid_for_seconds = Some(seconds);
    }

    /// Set the creation time, truncated to whole seconds.
    pub fn set_created_at<Z: TimeZone>(&mut self, time: &DateTime<Z>) {
        self.created_at = DateTime::from_timestamp(time.timestamp(), 0);
    }

    /// Replace subject and data.
    pub fn set_payload(&mut self, subject: impl Into<String>, data: Value) {
        self.payload = Some(CachePayload {
            subject: subject.into(),
            data,
        });
    }

    /// Replace the data, keeping the subject and creation time.
    ///
    /// Does nothing on an entry without a payload.
    pub fn replace_data(&mut self, data: Value) {
        if let Some(payload) = &mut self.payload {
            payload.data = data;
        }
    }

    /// Whether the entry currently holds data tagged with `subject`.
    pub fn is_for(&self, subject: &str) -> bool {
        self.payload.as_ref().is_some_and(|p| p.subject == subject)
    }

    /// Whether the entry is populated and not yet expired at `reference`.
    ///
    /// The entry stays valid up to and including `created_at + valid_for_seconds`.
    pub fn is_valid<Z: TimeZone>(&self, reference: &DateTime<Z>) -> bool {
        match (&self.payload, self.created_at, self.valid_for_seconds) {
            (Some(_), Some(created_at), Some(valid_for)) => {
                let valid_for = i64::try_from(valid_for).unwrap_or(i64::MAX);
                let expires = created_at.timestamp().saturating_add(valid_for);
                reference.timestamp() <= expires
            }
            _ => false,
        }
    }

    /// Persist the entry through `store`.
    pub fn save<S: CacheStore + ?Sized>(&self, store: &S) -> Result<(), CacheError> {
        store.set_entry(self)
    }

    /// Convert to the persisted form.
    pub fn to_stored(&self) -> StoredEntry {
        StoredEntry {
            create_timestamp: self.created_at.map(|t| t.timestamp()),
            valid_for_seconds: self.valid_for_seconds,
            data: self.payload.as_ref().map(|p| p.data.clone()),
            subject: self.payload.as_ref().map(|p| p.subject.clone()),
        }
    }

    /// Rebuild an entry from its persisted form.
    ///
    /// Data without a subject (or a subject without data) is dropped.
    pub fn from_stored(name: impl Into<String>, stored: StoredEntry) -> Self {
        let payload = match (stored.subject, stored.data) {
            (Some(subject), Some(data)) => Some(CachePayload { subject, data }),
            _ => None,
        };

        Self {
            name: name.into(),
            valid_for_seconds: stored.valid_for_seconds,
            created_at: stored
                .create_timestamp
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use chrono_tz::Europe::Berlin;
    use serde_json::json;

    fn populated(created_at: DateTime<Utc>, valid_for: u64) -> CacheEntry {
        let mut entry = CacheEntry::empty("rmv/3011005/last-result.json");
        entry.set_valid_for_seconds(valid_for);
        entry.set_created_at(&created_at);
        entry.set_payload("arrivals", json!([{"time": "10:35:00"}]));
        entry
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2019, 5, 6, 10, 0, 0).unwrap()
    }

    #[test]
    fn empty_entry_is_never_valid() {
        let entry = CacheEntry::empty("x");
        assert!(!entry.is_valid(&t0()));
        assert!(!entry.is_for("arrivals"));
    }

    #[test]
    fn missing_field_makes_entry_invalid() {
        let mut no_data = CacheEntry::empty("x");
        no_data.set_valid_for_seconds(300);
        no_data.set_created_at(&t0());
        assert!(!no_data.is_valid(&t0()));

        let mut no_timestamp = CacheEntry::empty("x");
        no_timestamp.set_valid_for_seconds(300);
        no_timestamp.set_payload("arrivals", json!([]));
        assert!(!no_timestamp.is_valid(&t0()));

        let mut no_validity = CacheEntry::empty("x");
        no_validity.set_created_at(&t0());
        no_validity.set_payload("arrivals", json!([]));
        assert!(!no_validity.is_valid(&t0()));
    }

    #[test]
    fn valid_until_expiry_inclusive() {
        let entry = populated(t0(), 300);
        assert!(entry.is_valid(&t0()));
        assert!(entry.is_valid(&(t0() + Duration::seconds(299))));
        assert!(entry.is_valid(&(t0() + Duration::seconds(300))));
        assert!(!entry.is_valid(&(t0() + Duration::seconds(301))));
    }

    #[test]
    fn validity_compares_instants_across_zones() {
        let entry = populated(t0(), 60);
        // 12:01 in Berlin (CEST) is 10:01 UTC
        let reference = Berlin.with_ymd_and_hms(2019, 5, 6, 12, 1, 0).unwrap();
        assert!(entry.is_valid(&reference));
        let reference = Berlin.with_ymd_and_hms(2019, 5, 6, 12, 1, 1).unwrap();
        assert!(!entry.is_valid(&reference));
    }

    #[test]
    fn is_for_matches_subject() {
        let entry = populated(t0(), 300);
        assert!(entry.is_for("arrivals"));
        assert!(!entry.is_for("departures"));
    }

    #[test]
    fn replace_data_keeps_subject_and_timestamp() {
        let mut entry = populated(t0(), 300);
        entry.replace_data(json!([]));
        assert!(entry.is_for("arrivals"));
        assert_eq!(entry.created_at(), Some(t0()));
        assert_eq!(entry.payload().unwrap().data, json!([]));
    }

    #[test]
    fn replace_data_on_empty_entry_does_nothing() {
        let mut entry = CacheEntry::empty("x");
        entry.replace_data(json!([1, 2]));
        assert!(entry.payload().is_none());
    }

    #[test]
    fn created_at_is_truncated_to_seconds() {
        let mut entry = CacheEntry::empty("x");
        entry.set_created_at(&(t0() + Duration::milliseconds(750)));
        assert_eq!(entry.created_at(), Some(t0()));
    }

    #[test]
    fn stored_json_shape() {
        let stored = populated(t0(), 300).to_stored();
        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(
            json,
            json!({
                "createTimestamp": 1557136800,
                "validForSeconds": 300,
                "data": [{"time": "10:35:00"}],
                "for": "arrivals"
            })
        );
    }

    #[test]
    fn stored_roundtrip_with_nested_data() {
        let mut entry = populated(t0(), 42);
        entry.set_payload(
            "departures",
            json!({"a": [1, 2, {"b": null, "c": "d"}], "e": {"f": [true, false]}, "g": 1.5}),
        );
        let restored = CacheEntry::from_stored(entry.name(), entry.to_stored());
        assert_eq!(restored, entry);
    }

    #[test]
    fn from_stored_without_subject_has_no_payload() {
        let stored = StoredEntry {
            create_timestamp: Some(1557136800),
            valid_for_seconds: Some(300),
            data: Some(json!([])),
            subject: None,
        };
        let entry = CacheEntry::from_stored("x", stored);
        assert!(entry.payload().is_none());
        assert!(!entry.is_valid(&t0()));
    }

    #[test]
    fn missing_fields_deserialize_as_unset() {
        let stored: StoredEntry = serde_json::from_str(r#"{"for": "arrivals"}"#).unwrap();
        assert_eq!(stored.subject.as_deref(), Some("arrivals"));
        assert!(stored.create_timestamp.is_none());
        assert!(stored.valid_for_seconds.is_none());
        assert!(stored.data.is_none());
    }
}
