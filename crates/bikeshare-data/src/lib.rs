//! Data layer for the bikeshare explorer.
//!
//! Reads per-city trip CSV files into an in-memory [`core::models::Dataset`],
//! narrows them with month/day filters and computes the time, station,
//! duration and demographic statistics reported for a query.

pub mod aggregator;
pub mod analysis;
pub mod duration_stats;
pub mod filter;
pub mod reader;
pub mod station_stats;
pub mod time_stats;
pub mod user_stats;

pub use analysis::{run_query, QueryMetadata, QueryReport};
pub use bikeshare_core as core;
