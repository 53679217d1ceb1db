use std::path::PathBuf;

use bikeshare_core::catalog::Catalog;
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name onto a tracing filter directive.
///
/// Unrecognised names fall back to `"warn"`.
pub fn level_directive(log_level: &str) -> &'static str {
    match log_level.trim().to_uppercase().as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARNING" | "WARN" => "warn",
        "ERROR" | "CRITICAL" => "error",
        _ => "warn",
    }
}

/// Initialise the global `tracing` subscriber.
///
/// All log output goes to stderr so that reports written to stdout can be
/// piped as-is.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(level_directive(log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let subscriber = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()?;

    Ok(())
}

// ── Data-file discovery ────────────────────────────────────────────────────────

/// Source files named by `catalog` that do not exist on disk.
///
/// Each one is logged as a warning; querying such a city later fails with
/// `SourceUnavailable`.
pub fn missing_sources(catalog: &Catalog) -> Vec<PathBuf> {
    catalog
        .cities
        .iter()
        .map(|entry| catalog.source_path(entry))
        .filter(|path| !path.is_file())
        .inspect(|path| warn!("City data file not found: {}", path.display()))
        .collect()
}

// ── Tests ──────────────────────────────────────────────────────────────────────
