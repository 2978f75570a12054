//! Station arrival and departure board.
//!
//! Shows the upcoming arrivals or departures of a set of stations, switching
//! between the two by time of day. Results from the RMV API are cached per
//! station on disk and trimmed to the current window on every read.

pub mod board;
pub mod cache;
pub mod config;
pub mod domain;
pub mod retriever;
pub mod rmv;
pub mod schedule;
pub mod station;
pub mod web;
