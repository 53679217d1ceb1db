//! Interactive question/answer loop used when no `--city` is given.

use std::io::{BufRead, Write};

use anyhow::{bail, Result};
use bikeshare_core::catalog::{validate_city, validate_day, validate_month, Catalog};
use bikeshare_data::reader::RawRowPager;

use crate::report::render_raw_rows;

/// Raw CSV rows shown per page.
pub const RAW_PAGE_SIZE: usize = 5;

/// A validated city/month/day selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub city: String,
    pub month: String,
    pub day: String,
}

/// Line-oriented prompts over any reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Write `text` followed by a newline.
    pub fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}")?;
        self.output.flush()?;
        Ok(())
    }

    /// Ask `question` until `validate` accepts the answer.
    ///
    /// Rejections are echoed back and the question repeated. Fails only when
    /// input ends.
    pub fn ask<F>(&mut self, question: &str, validate: F) -> Result<String>
    where
        F: Fn(&str) -> bikeshare_core::Result<String>,
    {
        loop {
            write!(self.output, "{question} ")?;
            self.output.flush()?;

            let Some(answer) = self.read_line()? else {
                bail!("input closed before a valid answer was given");
            };
            match validate(&answer) {
                Ok(value) => return Ok(value),
                Err(err) => self.say(&format!("{err}. Please try again."))?,
            }
        }
    }

    /// Ask for city, month and day in turn.
    pub fn ask_query(&mut self, catalog: &Catalog) -> Result<QueryRequest> {
        let cities = catalog.city_keys().collect::<Vec<_>>().join(", ");
        let city = self.ask(
            &format!("Which city would you like to explore? ({cities})"),
            |answer| validate_city(catalog, answer),
        )?;
        let month = self.ask(
            &format!("Which month? (all, {})", catalog.month_tokens().join(", ")),
            validate_month,
        )?;
        let day = self.ask(
            &format!(
                "Which day of the week? (all, {})",
                catalog.weekday_tokens().join(", ")
            ),
            validate_day,
        )?;

        Ok(QueryRequest { city, month, day })
    }

    /// Yes/no question. Only `yes` or `y` (any case) count as yes; end of
    /// input counts as no.
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        write!(self.output, "{question} (yes/no) ")?;
        self.output.flush()?;

        Ok(self
            .read_line()?
            .map(|answer| matches!(answer.to_lowercase().as_str(), "yes" | "y"))
            .unwrap_or(false))
    }

    /// Offer raw rows [`RAW_PAGE_SIZE`] at a time until the user declines or
    /// the file runs out. Returns the number of rows shown.
    pub fn page_raw_rows(&mut self, pager: &mut RawRowPager) -> Result<usize> {
        let mut shown = 0;
        while !pager.is_exhausted()
            && self.confirm(&format!(
                "Would you like to see {RAW_PAGE_SIZE} rows of raw trip data?"
            ))?
        {
            let page = pager.next_page(RAW_PAGE_SIZE)?;
            if page.is_empty() {
                self.say("No more rows.")?;
                break;
            }
            shown += page.len();
            let text = render_raw_rows(pager.headers(), &page);
            self.say(&text)?;
            self.say("")?;
        }
        Ok(shown)
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
