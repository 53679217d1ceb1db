//! Month and weekday restriction of a loaded dataset.

use bikeshare_core::catalog::{month_ordinal, normalize_token, ALL_TOKEN, MONTH_TOKENS};
use bikeshare_core::error::{BikeshareError, Result};
use bikeshare_core::models::{Dataset, DayOfWeek, FilteredView, TripRecord};
use serde::Serialize;

/// Month restriction: everything, or a single 1-based month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthFilter {
    All,
    Only(u32),
}

impl MonthFilter {
    /// Parse `"all"` or a month name (case-insensitive).
    pub fn parse(token: &str) -> Result<Self> {
        let normalized = normalize_token(token);
        if normalized == ALL_TOKEN {
            return Ok(MonthFilter::All);
        }
        month_ordinal(&normalized)
            .map(MonthFilter::Only)
            .ok_or_else(|| BikeshareError::InvalidFilterToken {
                dimension: "month",
                token: token.trim().to_string(),
            })
    }

    pub fn matches(self, record: &TripRecord) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Only(month) => record.month == month,
        }
    }

    /// Token form, e.g. `"all"` or `"march"`.
    pub fn token(self) -> &'static str {
        match self {
            MonthFilter::All => ALL_TOKEN,
            MonthFilter::Only(month) => month
                .checked_sub(1)
                .and_then(|idx| MONTH_TOKENS.get(idx as usize))
                .copied()
                .unwrap_or(ALL_TOKEN),
        }
    }
}

/// Weekday restriction: everything, or a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayFilter {
    All,
    Only(DayOfWeek),
}

impl DayFilter {
    /// Parse `"all"` or a weekday name (case-insensitive).
    pub fn parse(token: &str) -> Result<Self> {
        let normalized = normalize_token(token);
        if normalized == ALL_TOKEN {
            return Ok(DayFilter::All);
        }
        DayOfWeek::from_name(&normalized)
            .map(DayFilter::Only)
            .ok_or_else(|| BikeshareError::InvalidFilterToken {
                dimension: "day",
                token: token.trim().to_string(),
            })
    }

    pub fn matches(self, record: &TripRecord) -> bool {
        match self {
            DayFilter::All => true,
            DayFilter::Only(day) => record.day_of_week == day,
        }
    }

    /// Token form, e.g. `"all"` or `"Friday"`.
    pub fn token(self) -> &'static str {
        match self {
            DayFilter::All => ALL_TOKEN,
            DayFilter::Only(day) => day.name(),
        }
    }
}

/// Conjunction of a month and a weekday restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripFilter {
    pub month: MonthFilter,
    pub day: DayFilter,
}

impl TripFilter {
    /// A filter that keeps every record.
    pub const ALL: TripFilter = TripFilter {
        month: MonthFilter::All,
        day: DayFilter::All,
    };

    /// Parse both tokens; either may be `"all"`.
    pub fn parse(month: &str, day: &str) -> Result<Self> {
        Ok(Self {
            month: MonthFilter::parse(month)?,
            day: DayFilter::parse(day)?,
        })
    }

    pub fn matches(&self, record: &TripRecord) -> bool {
        self.month.matches(record) && self.day.matches(record)
    }

    /// Restrict `view`, keeping record order.
    pub fn apply<'a>(&self, view: &FilteredView<'a>) -> FilteredView<'a> {
        view.retain_matching(|record| self.matches(record))
    }

    /// Serializable summary of the active restrictions.
    pub fn describe(&self) -> FilterSummary {
        FilterSummary {
            month: self.month.token().to_string(),
            day: self.day.token().to_string(),
        }
    }
}

/// Normalised filter tokens, as echoed back in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSummary {
    pub month: String,
    pub day: String,
}

/// Restrict `dataset` to `month` and `day` (each `"all"` or a token).
///
/// Fails with `InvalidFilterToken` before touching any record when either
/// token is unrecognised.
pub fn filter<'a>(dataset: &'a Dataset, month: &str, day: &str) -> Result<FilteredView<'a>> {
    let trip_filter = TripFilter::parse(month, day)?;
    Ok(trip_filter.apply(&dataset.view()))
}
