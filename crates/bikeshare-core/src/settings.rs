use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::catalog::Catalog;
use crate::error::Result;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// How a finished query report is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Explore US bikeshare trip data
#[derive(Parser, Debug, Clone)]
#[command(
    name = "bikeshare",
    about = "Descriptive statistics over US bikeshare trip data",
    version
)]
pub struct Settings {
    /// City to analyse; prompts interactively when omitted
    #[arg(long)]
    pub city: Option<String>,

    /// Month filter (january-june) or "all"
    #[arg(long, default_value = "all")]
    pub month: String,

    /// Weekday filter (monday-sunday) or "all"
    #[arg(long, default_value = "all")]
    pub day: String,

    /// Directory holding the city CSV files
    #[arg(long, env = "BIKESHARE_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// JSON catalog replacing the built-in city list
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Offer to page through the raw CSV rows of the city
    #[arg(long)]
    pub raw: bool,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse process arguments and resolve derived values.
    pub fn load() -> Self {
        Self::resolve(Settings::parse())
    }

    /// Same as [`Settings::load`] over an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Settings::try_parse_from(args).map(Self::resolve)
    }

    /// `--debug` overrides the log level.
    fn resolve(mut settings: Settings) -> Self {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Build the catalog the loader will use: `--catalog` when given,
    /// otherwise the built-in cities under `--data-dir`.
    pub fn catalog(&self) -> Result<Catalog> {
        match &self.catalog {
            Some(path) => Catalog::from_json_file(path),
            None => Ok(Catalog::standard(self.data_dir.clone())),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
