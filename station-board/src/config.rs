//! Board configuration.
//!
//! Loaded from a TOML file whose path comes from `STATION_BOARD_CONFIG`
//! (default `config.toml`). Every section and key is optional. The RMV API
//! token can be supplied through `RMV_API_TOKEN` instead of the file.
//!
//! ```toml
//! cacheDirectory = "/var/cache/public-transport-info"
//! timezone = "Europe/Berlin"
//!
//! [displayTimeSpan]
//! start = "07:00"
//! modeSwitch = "11:00"
//! end = "18:00"
//!
//! [arrivalTimeSpan]
//! past = "1:00"
//! future = "0:10"
//!
//! [dataSources.rmv.factoryConfig]
//! dataFetchInterval = 60
//!
//! [dataSources.rmv.stationInfoConfig]
//! ignoreLines = ["100"]
//! stations = { train = ["3011005"], bus = ["3021243"] }
//! ```

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::Deserialize;

use crate::domain::{DomainError, DurationError, TimeError};

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_VAR: &str = "STATION_BOARD_CONFIG";

/// Environment variable overriding the RMV API token.
pub const RMV_TOKEN_VAR: &str = "RMV_API_TOKEN";

const DEFAULT_CONFIG_PATH: &str = "config.toml";
const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Berlin;
const DEFAULT_LISTEN: &str = "127.0.0.1:3000";

/// Errors from loading or interpreting the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid duration for {key}: {source}")]
    Duration {
        key: &'static str,
        #[source]
        source: DurationError,
    },

    #[error("invalid time for {key}: {source}")]
    Time {
        key: &'static str,
        #[source]
        source: TimeError,
    },

    #[error("unknown timezone: {0}")]
    Timezone(String),

    #[error("invalid listen address: {0}")]
    Listen(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("unknown data source: {0}")]
    UnknownDataSource(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardConfig {
    /// Directory holding the cache entries.
    pub cache_directory: Option<PathBuf>,
    /// IANA timezone name of the board's location.
    pub timezone: Option<String>,
    /// Address the HTTP server binds to.
    pub listen: Option<String>,
    pub display_time_span: DisplayTimeSpanConfig,
    pub arrival_time_span: TimeSpanConfig,
    pub departure_time_span: TimeSpanConfig,
    /// Data sources keyed by name.
    pub data_sources: BTreeMap<String, DataSourceConfig>,
}

/// When the board shows arrivals and departures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DisplayTimeSpanConfig {
    pub start: Option<String>,
    pub mode_switch: Option<String>,
    pub end: Option<String>,
}

/// A query window relative to the current time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TimeSpanConfig {
    /// "H:MM" before the reference time.
    pub past: Option<String>,
    /// "H:MM" after the reference time.
    pub future: Option<String>,
    pub min: Option<String>,
    pub max: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DataSourceConfig {
    pub factory_config: FactoryConfig,
    pub station_info_config: StationInfoConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FactoryConfig {
    pub api_token: Option<String>,
    /// Seconds a fetched result stays fresh.
    pub data_fetch_interval: Option<u64>,
    /// Override of the API base URL.
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StationInfoConfig {
    /// Station ids keyed by vehicle type name ("train", "bus").
    pub stations: BTreeMap<String, Vec<String>>,
    /// Lines left out of every request.
    pub ignore_lines: Vec<String>,
}

impl BoardConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Read and parse the file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Load the configuration the way the server does.
    ///
    /// A path given through `STATION_BOARD_CONFIG` must exist. Without it,
    /// `config.toml` is read if present and defaults are used otherwise.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::load(path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).is_file() => Self::load(DEFAULT_CONFIG_PATH)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Apply overrides looked up through `var`.
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(token) = var(RMV_TOKEN_VAR).filter(|t| !t.is_empty()) {
            // Data source names match case-insensitively
            let name = self
                .data_sources
                .keys()
                .find(|name| name.eq_ignore_ascii_case("rmv"))
                .cloned()
                .unwrap_or_else(|| "rmv".to_string());
            self.data_sources.entry(name).or_default().factory_config.api_token = Some(token);
        }
    }

    /// The configured timezone, defaulting to Europe/Berlin.
    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        match &self.timezone {
            Some(name) => name
                .parse()
                .map_err(|_| ConfigError::Timezone(name.clone())),
            None => Ok(DEFAULT_TIMEZONE),
        }
    }

    /// The cache directory, defaulting to `public-transport-info` in the
    /// system temp directory.
    pub fn cache_directory(&self) -> PathBuf {
        self.cache_directory
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("public-transport-info"))
    }

    /// The server's listen address.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let listen = self.listen.as_deref().unwrap_or(DEFAULT_LISTEN);
        listen
            .parse()
            .map_err(|_| ConfigError::Listen(listen.to_string()))
    }
}
