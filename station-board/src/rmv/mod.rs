//! RMV (Rhein-Main-Verkehrsverbund) HAFAS API integration.
//!
//! This module provides:
//! - [`StationBoardRequest`]: arrival and departure board query parameters
//! - [`RmvClient`]: blocking HTTP client for the board services
//! - [`RmvStationInfoFetcher`] and [`RmvLoaderFactory`]: the station loader wiring

mod client;
mod convert;
mod error;
mod factory;
mod fetcher;
mod request;
mod types;

pub use client::{DEFAULT_BASE_URL, RmvClient, RmvConfig};
pub use convert::{ConversionError, convert_board, convert_item};
pub use error::RmvError;
pub use factory::RmvLoaderFactory;
pub use fetcher::RmvStationInfoFetcher;
pub use request::{BoardKind, MAX_DURATION_MINUTES, RtMode, StationBoardRequest};
pub use types::{BoardItem, BoardResponse, OneOrMany, Product};
