mod bootstrap;
mod prompt;
mod report;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use bikeshare_core::catalog::Catalog;
use bikeshare_core::settings::{OutputFormat, Settings};
use bikeshare_data::reader::RawRowPager;
use bikeshare_data::{run_query, QueryReport};

use crate::prompt::Prompter;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("bikeshare v{} starting", env!("CARGO_PKG_VERSION"));

    let catalog = settings.catalog().context("failed to load city catalog")?;
    bootstrap::missing_sources(&catalog);

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());

    match settings.city.as_deref() {
        Some(city) => {
            tracing::info!(
                "Running query for {} (month: {}, day: {})",
                city,
                settings.month,
                settings.day
            );
            let report = run_query(&catalog, city, &settings.month, &settings.day)?;
            prompter.say(&render(&report, settings.format)?)?;

            if settings.raw {
                offer_raw_rows(&mut prompter, &catalog, city)?;
            }
        }
        None => run_interactive(&mut prompter, &catalog, settings.format)?,
    }

    Ok(())
}

/// Prompt, report, offer raw rows, and repeat while the user asks to restart.
fn run_interactive<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    catalog: &Catalog,
    format: OutputFormat,
) -> Result<()> {
    prompter.say("Hello! Let's explore some US bikeshare data!")?;

    loop {
        let request = prompter.ask_query(catalog)?;

        match run_query(catalog, &request.city, &request.month, &request.day) {
            Ok(report) => {
                prompter.say(&render(&report, format)?)?;
                offer_raw_rows(prompter, catalog, &request.city)?;
            }
            Err(err) => {
                tracing::error!("Query failed: {}", err);
                prompter.say(&format!("Error: {err}"))?;
            }
        }

        if !prompter.confirm("Would you like to restart?")? {
            break;
        }
    }

    Ok(())
}

fn offer_raw_rows<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    catalog: &Catalog,
    city: &str,
) -> Result<()> {
    let entry = catalog.resolve(city)?;
    let mut pager = RawRowPager::open(&catalog.source_path(entry))?;
    let shown = prompter.page_raw_rows(&mut pager)?;
    tracing::debug!("Displayed {} raw rows for {}", shown, entry.key);
    Ok(())
}

fn render(report: &QueryReport, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => report::render_text(report),
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
    })
}

// ── Tests ──────────────────────────────────────────────────────────────────────
