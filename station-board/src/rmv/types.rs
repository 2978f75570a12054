//! RMV HAFAS response DTOs.
//!
//! These types map directly to the JSON of the `arrivalBoard` and
//! `departureBoard` services. Fields the board does not use are not mapped.

use serde::Deserialize;

/// Response of `arrivalBoard` or `departureBoard`.
///
/// The API leaves out the list entirely when nothing matches.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BoardResponse {
    #[serde(rename = "Arrival", default)]
    pub arrivals: Vec<BoardItem>,

    #[serde(rename = "Departure", default)]
    pub departures: Vec<BoardItem>,

    #[serde(rename = "serverVersion")]
    pub server_version: Option<String>,
}

/// One arrival or departure on a board.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardItem {
    /// Display name of the journey, e.g. "Bus 302".
    pub name: Option<String>,

    /// Product information. Older API versions send an object, newer ones
    /// an array with one element per section.
    #[serde(rename = "Product")]
    pub product: Option<OneOrMany<Product>>,

    /// Name of the board's stop.
    pub stop: Option<String>,

    /// Planned date, "YYYY-MM-DD".
    pub date: Option<String>,

    /// Planned time, "HH:MM:SS".
    pub time: Option<String>,

    /// Real-time date, when real-time data is available.
    pub rt_date: Option<String>,

    /// Real-time time, when real-time data is available.
    pub rt_time: Option<String>,

    /// Where the journey started (arrival boards only).
    pub origin: Option<String>,

    /// Where the journey ends (departure boards only).
    pub direction: Option<String>,
}

impl BoardItem {
    /// The first product of the item.
    pub fn first_product(&self) -> Option<&Product> {
        match self.product.as_ref()? {
            OneOrMany::One(product) => Some(product),
            OneOrMany::Many(products) => products.first(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Line name, e.g. "RB40" or "302".
    pub line: Option<String>,

    pub name: Option<String>,

    pub cat_out: Option<String>,

    pub operator: Option<String>,
}

/// A JSON value that is either a single item or an array of items.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}
