//! Loader factory for RMV stations.

use std::sync::Arc;

use chrono_tz::Tz;

use crate::cache::CacheStore;
use crate::config::FactoryConfig;
use crate::domain::VehicleType;
use crate::station::{DEFAULT_DATA_FETCH_INTERVAL, StationInfoFetcher, StationInfoLoaderFactory};

use super::client::{RmvClient, RmvConfig};
use super::error::RmvError;
use super::fetcher::RmvStationInfoFetcher;

/// Creates loaders whose fetchers query the RMV API.
pub struct RmvLoaderFactory {
    client: RmvClient,
    store: Arc<dyn CacheStore>,
    data_fetch_interval: u64,
    tz: Tz,
}

impl RmvLoaderFactory {
    /// Cache key prefix of RMV stations.
    pub const IDENTIFIER: &'static str = "rmv";

    pub fn new(client: RmvClient, store: Arc<dyn CacheStore>, data_fetch_interval: u64, tz: Tz) -> Self {
        Self {
            client,
            store,
            data_fetch_interval,
            tz,
        }
    }

    /// Build the factory from its configuration. An API token is required.
    pub fn from_config(config: &FactoryConfig, store: Arc<dyn CacheStore>, tz: Tz) -> Result<Self, RmvError> {
        let token = config
            .api_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or(RmvError::MissingToken)?;

        let mut client_config = RmvConfig::new(token);
        if let Some(base_url) = &config.base_url {
            client_config = client_config.with_base_url(base_url);
        }

        Ok(Self::new(
            RmvClient::new(client_config)?,
            store,
            config.data_fetch_interval.unwrap_or(DEFAULT_DATA_FETCH_INTERVAL),
            tz,
        ))
    }
}

impl StationInfoLoaderFactory for RmvLoaderFactory {
    fn identifier(&self) -> &str {
        Self::IDENTIFIER
    }

    fn data_fetch_interval(&self) -> u64 {
        self.data_fetch_interval
    }

    fn store(&self) -> Arc<dyn CacheStore> {
        self.store.clone()
    }

    fn fetcher(
        &self,
        station_id: &str,
        vehicle_type: VehicleType,
        ignore_lines: &[String],
    ) -> Box<dyn StationInfoFetcher> {
        Box::new(RmvStationInfoFetcher::new(
            self.client.clone(),
            station_id,
            ignore_lines.to_vec(),
            vehicle_type,
            self.tz,
        ))
    }
}
