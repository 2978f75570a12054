//! In-memory cache store for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::entry::CacheEntry;
use super::error::CacheError;
use super::store::{CacheStore, decode_entry, encode_entry};

/// Keeps encoded entries in a map and counts writes.
#[derive(Debug, Default)]
pub(crate) struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
}

impl MemoryCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Number of `set_entry` calls so far.
    pub(crate) fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Store raw text under `name` without counting a write.
    pub(crate) fn insert_raw(&self, name: &str, contents: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(name.to_string(), contents.to_string());
    }
}

impl CacheStore for MemoryCache {
    fn has_entry(&self, name: &str) -> bool {
        self.entries.lock().unwrap().contains_key(name)
    }

    fn get_entry(&self, name: &str) -> CacheEntry {
        let entries = self.entries.lock().unwrap();
        entries
            .get(name)
            .and_then(|contents| decode_entry(name, contents))
            .unwrap_or_else(|| CacheEntry::empty(name))
    }

    fn set_entry(&self, entry: &CacheEntry) -> Result<(), CacheError> {
        let json = encode_entry(entry)?;
        self.entries
            .lock()
            .unwrap()
            .insert(entry.name().to_string(), json);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
