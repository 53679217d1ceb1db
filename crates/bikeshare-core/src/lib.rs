//! Shared building blocks for the bikeshare explorer.
//!
//! Holds the error type, the trip data model, the city catalog, timestamp
//! parsing, command-line settings and text formatting helpers used by the
//! data pipeline and the binary.

pub mod catalog;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{BikeshareError, Result};
