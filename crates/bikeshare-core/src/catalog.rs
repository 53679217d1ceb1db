//! Static description of the cities the explorer knows about.
//!
//! A [`Catalog`] maps a city key to its CSV file and owns the month and
//! weekday tokens that filters are validated against. It is built once at
//! startup and handed to the loader; nothing mutates it afterwards.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BikeshareError, Result};
use crate::models::DayOfWeek;

/// Sentinel filter token meaning "no restriction".
pub const ALL_TOKEN: &str = "all";

/// Months covered by the datasets, in calendar order (January = 1).
pub const MONTH_TOKENS: [&str; 6] = ["january", "february", "march", "april", "may", "june"];

/// Weekday tokens, Monday first.
pub const WEEKDAY_TOKENS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// One city and the file holding its trips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityEntry {
    /// Lower-case lookup key, e.g. `"new york city"`.
    pub key: String,
    /// Display name, e.g. `"New York City"`.
    pub name: String,
    /// File name relative to the catalog's data directory.
    pub file: String,
}

impl CityEntry {
    fn new(key: &str, name: &str, file: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            file: file.to_string(),
        }
    }
}

/// Immutable city → source-file configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub data_dir: PathBuf,
    pub cities: Vec<CityEntry>,
}

impl Catalog {
    /// The three built-in cities, with files expected under `data_dir`.
    pub fn standard(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            cities: vec![
                CityEntry::new("chicago", "Chicago", "chicago.csv"),
                CityEntry::new("new york city", "New York City", "new_york_city.csv"),
                CityEntry::new("washington", "Washington", "washington.csv"),
            ],
        }
    }

    /// Load a catalog from a JSON document.
    ///
    /// A relative or missing `data_dir` is resolved against the directory
    /// containing the document.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|source| BikeshareError::SourceUnavailable {
                path: path.to_path_buf(),
                source,
            })?;
        let mut catalog: Catalog = serde_json::from_str(&content)?;

        if catalog.cities.is_empty() {
            return Err(BikeshareError::Config(format!(
                "catalog {} lists no cities",
                path.display()
            )));
        }
        for city in &mut catalog.cities {
            city.key = normalize_token(&city.key);
        }
        if catalog.data_dir.is_relative() {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            catalog.data_dir = base.join(&catalog.data_dir);
        }

        debug!(
            "Loaded catalog {} with {} cities under {}",
            path.display(),
            catalog.cities.len(),
            catalog.data_dir.display()
        );
        Ok(catalog)
    }

    /// Look up a city by key, ignoring case and surrounding whitespace.
    pub fn resolve(&self, city: &str) -> Result<&CityEntry> {
        let wanted = normalize_token(city);
        self.cities
            .iter()
            .find(|entry| entry.key == wanted)
            .ok_or_else(|| BikeshareError::UnknownCity(city.trim().to_string()))
    }

    /// Full path of a city's source file.
    pub fn source_path(&self, entry: &CityEntry) -> PathBuf {
        self.data_dir.join(&entry.file)
    }

    pub fn city_keys(&self) -> impl Iterator<Item = &str> {
        self.cities.iter().map(|c| c.key.as_str())
    }

    pub fn month_tokens(&self) -> &'static [&'static str] {
        &MONTH_TOKENS
    }

    pub fn weekday_tokens(&self) -> &'static [&'static str] {
        &WEEKDAY_TOKENS
    }
}

// ── Validation ────────────────────────────────────────────────────────────────

/// Lower-case and trim a user-supplied token.
pub fn normalize_token(token: &str) -> String {
    token.trim().to_lowercase()
}

/// Convert a month token to its 1-based ordinal (`"january"` → 1).
pub fn month_ordinal(token: &str) -> Option<u32> {
    let wanted = normalize_token(token);
    MONTH_TOKENS
        .iter()
        .position(|m| *m == wanted)
        .map(|idx| idx as u32 + 1)
}

/// Validate a city token against the catalog, returning its key.
pub fn validate_city(catalog: &Catalog, token: &str) -> Result<String> {
    catalog.resolve(token).map(|entry| entry.key.clone())
}

/// Validate a month token, returning `"all"` or the normalised month name.
pub fn validate_month(token: &str) -> Result<String> {
    let normalized = normalize_token(token);
    if normalized == ALL_TOKEN || month_ordinal(&normalized).is_some() {
        Ok(normalized)
    } else {
        Err(BikeshareError::InvalidFilterToken {
            dimension: "month",
            token: token.trim().to_string(),
        })
    }
}

/// Validate a weekday token, returning `"all"` or the normalised day name.
pub fn validate_day(token: &str) -> Result<String> {
    let normalized = normalize_token(token);
    if normalized == ALL_TOKEN || DayOfWeek::from_name(&normalized).is_some() {
        Ok(normalized)
    } else {
        Err(BikeshareError::InvalidFilterToken {
            dimension: "day",
            token: token.trim().to_string(),
        })
    }
}
