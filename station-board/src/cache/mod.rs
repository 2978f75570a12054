//! File-backed cache of expiring entries.
//!
//! Each entry is one JSON file holding its creation time, how long it stays
//! valid, a subject tag and the cached data. The cache is meant for a single
//! process invoked periodically; concurrent writers to the same entry simply
//! overwrite each other.

mod entry;
mod error;
#[cfg(test)]
mod memory;
mod store;

pub use entry::{CacheEntry, CachePayload, StoredEntry};
pub use error::CacheError;
#[cfg(test)]
pub(crate) use memory::MemoryCache;
pub use store::{CacheStore, FileCache};
