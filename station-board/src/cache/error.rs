//! Cache error types.

use std::path::PathBuf;

/// Errors that can occur when persisting a cache entry.
///
/// Reading never fails: unreadable or corrupt entries are treated as empty.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Creating the entry's directory or writing its file failed
    #[error("failed to write cache entry {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The entry could not be serialized
    #[error("failed to serialize cache entry: {0}")]
    Serialize(#[from] serde_json::Error),
}
