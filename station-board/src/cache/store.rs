//! Storage backends for cache entries.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::warn;

use super::entry::{CacheEntry, StoredEntry};
use super::error::CacheError;

/// A key-value store of cache entries.
///
/// The store keeps no entries in memory; every lookup goes to the backing
/// storage and every entry is written back explicitly.
pub trait CacheStore: Send + Sync {
    /// Whether an entry named `name` exists.
    fn has_entry(&self, name: &str) -> bool;

    /// Load the entry named `name`.
    ///
    /// Missing or corrupt entries come back empty, with only the name set.
    fn get_entry(&self, name: &str) -> CacheEntry;

    /// Persist `entry` under its name, overwriting any existing entry.
    fn set_entry(&self, entry: &CacheEntry) -> Result<(), CacheError>;

    /// A fresh entry without data.
    fn create_entry(&self, name: &str, valid_for_seconds: u64) -> CacheEntry {
        let mut entry = CacheEntry::empty(name);
        entry.set_valid_for_seconds(valid_for_seconds);
        entry
    }

    /// Load the entry if it exists, otherwise create a fresh one.
    ///
    /// A loaded entry keeps its persisted validity. `valid_for_seconds` applies
    /// to new entries and to loaded ones that carry no validity, such as
    /// corrupt files read back as empty.
    fn get_or_create_entry(&self, name: &str, valid_for_seconds: u64) -> CacheEntry {
        if !self.has_entry(name) {
            return self.create_entry(name, valid_for_seconds);
        }

        let mut entry = self.get_entry(name);
        if entry.valid_for_seconds().is_none() {
            entry.set_valid_for_seconds(valid_for_seconds);
        }
        entry
    }
}

/// Decode the text of a persisted entry.
///
/// Returns `None` unless the text is a JSON object of the stored-entry shape.
pub(crate) fn decode_entry(name: &str, contents: &str) -> Option<CacheEntry> {
    let value: Value = serde_json::from_str(contents).ok()?;
    if !value.is_object() {
        return None;
    }
    let stored: StoredEntry = serde_json::from_value(value).ok()?;
    Some(CacheEntry::from_stored(name, stored))
}

/// Encode an entry for persisting.
pub(crate) fn encode_entry(entry: &CacheEntry) -> Result<String, CacheError> {
    Ok(serde_json::to_string(&entry.to_stored())?)
}

/// Disk-backed cache store.
///
/// Entry names are paths relative to the base directory, so
/// `"rmv/3011005/last-result.json"` lives at
/// `{base}/rmv/3011005/last-result.json`.
#[derive(Debug, Clone)]
pub struct FileCache {
    base_path: PathBuf,
}

impl FileCache {
    /// Create a store rooted at `base_path`. The directory is created lazily.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// The base directory.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn entry_path(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }
}

impl CacheStore for FileCache {
    fn has_entry(&self, name: &str) -> bool {
        self.entry_path(name).is_file()
    }

    fn get_entry(&self, name: &str) -> CacheEntry {
        let path = self.entry_path(name);

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return CacheEntry::empty(name),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read cache entry, treating as empty");
                return CacheEntry::empty(name);
            }
        };

        decode_entry(name, &contents).unwrap_or_else(|| {
            warn!(path = %path.display(), "Corrupt cache entry, treating as empty");
            CacheEntry::empty(name)
        })
    }

    fn set_entry(&self, entry: &CacheEntry) -> Result<(), CacheError> {
        let path = self.entry_path(entry.name());

        // Create parent directories if needed
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|source| CacheError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = encode_entry(entry)?;

        std::fs::write(&path, json).map_err(|source| CacheError::Io { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use tempfile::tempdir;

    const NAME: &str = "rmv/3011005/last-result.json";

    fn populated() -> CacheEntry {
        let mut entry = CacheEntry::empty(NAME);
        entry.set_valid_for_seconds(300);
        entry.set_created_at(&Utc.with_ymd_and_hms(2019, 5, 6, 10, 0, 0).unwrap());
        entry.set_payload("departures", json!([{"time": "10:55:00"}]));
        entry
    }

    #[test]
    fn save_and_load_entry() {
        let dir = tempdir().unwrap();
        let cache = FileCache::new(dir.path());

        populated().save(&cache).unwrap();

        assert!(cache.has_entry(NAME));
        assert_eq!(cache.get_entry(NAME), populated());
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempdir().unwrap();
        let cache = FileCache::new(dir.path().join("nested"));

        cache.set_entry(&populated()).unwrap();
        assert!(dir.path().join("nested").join(NAME).is_file());
    }

    #[test]
    fn overwrites_existing_entry() {
        let dir = tempdir().unwrap();
        let cache = FileCache::new(dir.path());

        let mut entry = populated();
        cache.set_entry(&entry).unwrap();
        entry.set_payload("arrivals", json!([]));
        cache.set_entry(&entry).unwrap();

        let loaded = cache.get_entry(NAME);
        assert!(loaded.is_for("arrivals"));
        assert_eq!(loaded.payload().unwrap().data, json!([]));
    }

    #[test]
    fn writes_documented_file_format() {
        let dir = tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        cache.set_entry(&populated()).unwrap();

        let contents = std::fs::read_to_string(dir.path().join(NAME)).unwrap();
        let json: Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(json["createTimestamp"], 1557136800);
        assert_eq!(json["validForSeconds"], 300);
        assert_eq!(json["for"], "departures");
        assert_eq!(json["data"][0]["time"], "10:55:00");
    }

    #[test]
    fn missing_entry_is_empty() {
        let dir = tempdir().unwrap();
        let cache = FileCache::new(dir.path());

        assert!(!cache.has_entry(NAME));
        assert_eq!(cache.get_entry(NAME), CacheEntry::empty(NAME));
    }

    #[test]
    fn directory_is_not_an_entry() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("rmv/3011005")).unwrap();
        let cache = FileCache::new(dir.path());

        assert!(!cache.has_entry("rmv/3011005"));
        assert!(!cache.has_entry("rmv"));
    }

    #[test]
    fn corrupt_entries_are_empty() {
        let dir = tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        let path = dir.path().join(NAME);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();

        for contents in [
            "not json at all",
            "[1, 2, 3]",
            "\"a string\"",
            "42",
            // Timestamps written as clock strings by older versions
            r#"{"createTimestamp": "10:00:00", "validForSeconds": 60, "data": [], "for": "arrivals"}"#,
        ] {
            std::fs::write(&path, contents).unwrap();
            assert!(cache.has_entry(NAME));
            assert_eq!(cache.get_entry(NAME), CacheEntry::empty(NAME), "{contents}");
        }
    }

    #[test]
    fn string_data_is_kept_as_opaque_value() {
        let dir = tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        let path = dir.path().join(NAME);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            r#"{"createTimestamp": 1557136800, "validForSeconds": 60, "data": "legacy", "for": "arrivals"}"#,
        )
        .unwrap();

        let entry = cache.get_entry(NAME);
        assert!(entry.is_for("arrivals"));
        assert_eq!(entry.payload().unwrap().data, json!("legacy"));
    }

    #[test]
    fn get_or_create_uses_persisted_validity() {
        let dir = tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        cache.set_entry(&populated()).unwrap();

        let entry = cache.get_or_create_entry(NAME, 60);
        assert_eq!(entry.valid_for_seconds(), Some(300));
    }

    #[test]
    fn get_or_create_fills_missing_validity() {
        let dir = tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        let path = dir.path().join(NAME);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();

        for contents in [
            r#"{"createTimestamp": "10:00:00", "validForSeconds": 60, "data": [], "for": "arrivals"}"#,
            r#"{"createTimestamp": 1557136800, "validForSeconds": null, "data": [], "for": "arrivals"}"#,
        ] {
            std::fs::write(&path, contents).unwrap();
            let entry = cache.get_or_create_entry(NAME, 120);
            assert_eq!(entry.valid_for_seconds(), Some(120), "{contents}");
        }
    }

    #[test]
    fn get_or_create_makes_fresh_entry() {
        let dir = tempdir().unwrap();
        let cache = FileCache::new(dir.path());

        let entry = cache.get_or_create_entry(NAME, 60);
        assert_eq!(entry.name(), NAME);
        assert_eq!(entry.valid_for_seconds(), Some(60));
        assert!(entry.payload().is_none());
        assert!(entry.created_at().is_none());
        assert!(!cache.has_entry(NAME));
    }

    #[test]
    fn write_failure_is_reported() {
        let dir = tempdir().unwrap();
        // A file where the entry's parent directory should be
        std::fs::write(dir.path().join("rmv"), "blocker").unwrap();
        let cache = FileCache::new(dir.path());

        let err = cache.set_entry(&populated()).unwrap_err();
        assert!(matches!(err, CacheError::Io { .. }));
    }
}
