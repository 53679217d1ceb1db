use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the bikeshare pipeline.
#[derive(Error, Debug)]
pub enum BikeshareError {
    /// The city token is not one of the catalog's cities.
    #[error("Unknown city: {0}")]
    UnknownCity(String),

    /// A city's source file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row (or the header, on line 1) could not be turned into a trip record.
    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    /// A month or day filter token is neither `all` nor a recognised token.
    #[error("Invalid {dimension} filter: {token}")]
    InvalidFilterToken {
        dimension: &'static str,
        token: String,
    },

    /// A statistic has no meaningful value over zero observations.
    #[error("No data to compute {statistic}")]
    EmptyInput { statistic: &'static str },

    /// A catalog document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BikeshareError {
    /// Shorthand for a [`BikeshareError::MalformedRecord`].
    pub fn malformed(line: u64, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the bikeshare crates.
pub type Result<T> = std::result::Result<T, BikeshareError>;
