//! Station info error types.

use crate::cache::CacheError;

/// Errors that can occur while loading station infos.
#[derive(Debug, thiserror::Error)]
pub enum StationError {
    /// Writing the station's cache entry failed
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The fetcher could not retrieve infos from its source
    #[error("failed to fetch station infos: {0}")]
    Fetch(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StationError {
    /// Wrap a fetcher's error.
    pub fn fetch(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        StationError::Fetch(err.into())
    }
}
