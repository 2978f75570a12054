//! Wiring a data source's fetcher to its per-station cache.

use std::sync::Arc;

use crate::cache::CacheStore;
use crate::domain::VehicleType;

use super::cache::StationInfoCache;
use super::loader::{StationInfoFetcher, StationInfoLoader};

/// Seconds a fetched result stays fresh when not configured.
pub const DEFAULT_DATA_FETCH_INTERVAL: u64 = 300;

/// Creates loaders for the stations of one data source.
pub trait StationInfoLoaderFactory {
    /// Short name of the data source, used as the first segment of cache keys.
    fn identifier(&self) -> &str;

    /// Seconds a fetched result stays fresh.
    fn data_fetch_interval(&self) -> u64;

    /// Store holding the cache entries.
    fn store(&self) -> Arc<dyn CacheStore>;

    /// A fetcher for a single station.
    fn fetcher(
        &self,
        station_id: &str,
        vehicle_type: VehicleType,
        ignore_lines: &[String],
    ) -> Box<dyn StationInfoFetcher>;

    /// A loader for a single station, backed by the entry
    /// `{identifier}/{station_id}/last-result.json`.
    fn create_loader(
        &self,
        station_id: &str,
        vehicle_type: VehicleType,
        ignore_lines: &[String],
    ) -> StationInfoLoader {
        let cache = StationInfoCache::new(
            self.store(),
            self.identifier(),
            station_id,
            self.data_fetch_interval(),
        );
        StationInfoLoader::new(cache, self.fetcher(station_id, vehicle_type, ignore_lines))
    }
}
