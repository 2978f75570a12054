//! The station board: what to show at a given moment.
//!
//! [`StationBoard`] ties the pieces together. For each request it picks the
//! display mode, builds a fresh retriever over all configured data sources
//! and returns the merged records sorted by planned time. Failures never
//! escape; they become a single error item that the display can render.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{CacheStore, FileCache};
use crate::config::{BoardConfig, ConfigError, DataSourceConfig};
use crate::domain::EventRecord;
use crate::retriever::DataRetriever;
use crate::rmv::{RmvError, RmvLoaderFactory};
use crate::schedule::{DisplayMode, DisplayModeSelector, RelativeTimeSpan};
use crate::station::{StationError, StationInfoLoaderFactory};

/// Errors while answering a board request.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Rmv(#[from] RmvError),

    #[error(transparent)]
    Station(#[from] StationError),
}

/// One element of the board's JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BoardItem {
    Event(EventRecord),
    Error {
        #[serde(rename = "errorMessage")]
        error_message: String,
    },
}

pub struct StationBoard {
    display: DisplayModeSelector,
    arrival_span: RelativeTimeSpan,
    departure_span: RelativeTimeSpan,
    tz: Tz,
    store: Arc<dyn CacheStore>,
    data_sources: Vec<(String, DataSourceConfig)>,
}

impl StationBoard {
    /// Build the board from configuration, caching in the configured directory.
    pub fn from_config(config: &BoardConfig) -> Result<Self, ConfigError> {
        Self::with_store(config, Arc::new(FileCache::new(config.cache_directory())))
    }

    /// Build the board from configuration with the given cache store.
    pub fn with_store(config: &BoardConfig, store: Arc<dyn CacheStore>) -> Result<Self, ConfigError> {
        Ok(Self {
            display: DisplayModeSelector::from_config(&config.display_time_span)?,
            arrival_span: RelativeTimeSpan::from_config(&config.arrival_time_span)?,
            departure_span: RelativeTimeSpan::from_config(&config.departure_time_span)?,
            tz: config.timezone()?,
            store,
            data_sources: config
                .data_sources
                .iter()
                .map(|(name, source)| (name.clone(), source.clone()))
                .collect(),
        })
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// The board at `reference`, or now when `None`.
    ///
    /// Outside the display window the board is empty. Errors are logged and
    /// returned as a single error item.
    pub fn infos(&self, reference: Option<DateTime<Tz>>) -> Vec<BoardItem> {
        let reference = reference.unwrap_or_else(|| Utc::now().with_timezone(&self.tz));

        match self.records(&reference) {
            Ok(records) => records.into_iter().map(BoardItem::Event).collect(),
            Err(e) => {
                warn!(%reference, error = %e, "Failed to load board");
                vec![BoardItem::Error {
                    error_message: e.to_string(),
                }]
            }
        }
    }

    /// The records shown at `reference`, sorted by planned time.
    pub fn records(&self, reference: &DateTime<Tz>) -> Result<Vec<EventRecord>, BoardError> {
        let mode = self.display.display_mode(reference.time());
        debug!(%reference, ?mode, "Display mode");

        let mut records = match mode {
            DisplayMode::None => return Ok(Vec::new()),
            DisplayMode::Arrival => self.retriever()?.retrieve_arrivals(reference)?,
            DisplayMode::Departure => self.retriever()?.retrieve_departures(reference)?,
        };

        records.sort_by(|a, b| a.time.cmp(&b.time));
        Ok(records)
    }

    /// A retriever with loaders for every station of every data source.
    fn retriever(&self) -> Result<DataRetriever, BoardError> {
        let mut retriever = DataRetriever::new(self.arrival_span.clone(), self.departure_span.clone());

        for (name, source) in &self.data_sources {
            let factory = self.factory(name, source)?;
            retriever.add_stations(&source.station_info_config, factory.as_ref())?;
        }

        Ok(retriever)
    }

    fn factory(
        &self,
        name: &str,
        source: &DataSourceConfig,
    ) -> Result<Box<dyn StationInfoLoaderFactory>, BoardError> {
        if name.eq_ignore_ascii_case(RmvLoaderFactory::IDENTIFIER) {
            let factory = RmvLoaderFactory::from_config(&source.factory_config, self.store.clone(), self.tz)?;
            Ok(Box::new(factory))
        } else {
            Err(ConfigError::UnknownDataSource(name.to_string()).into())
        }
    }
}
