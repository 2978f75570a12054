//! Per-station caching and loading of arrivals and departures.

mod cache;
mod error;
mod factory;
mod loader;

pub use cache::{StationInfoCache, StationInfos, station_cache_key};
pub use error::StationError;
pub use factory::{DEFAULT_DATA_FETCH_INTERVAL, StationInfoLoaderFactory};
pub use loader::{StationInfoFetcher, StationInfoLoader};
