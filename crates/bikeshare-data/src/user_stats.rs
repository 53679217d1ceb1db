//! Rider demographics: user types, gender and birth years.
//!
//! Gender and birth-year statistics exist only for cities whose file carries
//! those columns. A missing column yields [`Statistic::NotApplicable`]; a
//! present column with no usable values yields [`Statistic::EmptyInput`].

use bikeshare_core::error::{BikeshareError, Result};
use bikeshare_core::models::{CategoryCount, FilteredView, Statistic, MISSING_BUCKET};
use serde::Serialize;

use crate::aggregator::{Mode, ValueCounts};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub most_recent: i32,
    pub most_common: Mode<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserStats {
    /// Ordered by count descending, then value ascending.
    pub user_types: Vec<CategoryCount>,
    pub genders: Statistic<Vec<CategoryCount>>,
    pub birth_years: Statistic<BirthYearStats>,
}

/// Trips per user type. Empty cells count under [`MISSING_BUCKET`]; an empty
/// view gives an empty list.
pub fn user_type_counts(view: &FilteredView<'_>) -> Vec<CategoryCount> {
    view.iter()
        .map(|r| r.user_type.as_deref().unwrap_or(MISSING_BUCKET))
        .collect::<ValueCounts<&str>>()
        .to_categories()
}

/// Trips per gender, or `None` when the dataset has no gender column.
/// Empty cells count under [`MISSING_BUCKET`].
pub fn gender_counts(view: &FilteredView<'_>) -> Option<Vec<CategoryCount>> {
    if !view.schema().has_gender {
        return None;
    }
    let counts: ValueCounts<&str> = view
        .iter()
        .map(|r| r.gender.as_deref().unwrap_or(MISSING_BUCKET))
        .collect();
    Some(counts.to_categories())
}

/// Earliest, most recent and most common birth year over the records that
/// have one.
///
/// Returns `None` when the dataset has no birth-year column, and
/// `Some(Err(EmptyInput))` when the column exists but no record in the view
/// carries a value.
pub fn birth_year_stats(view: &FilteredView<'_>) -> Option<Result<BirthYearStats>> {
    if !view.schema().has_birth_year {
        return None;
    }

    let years: ValueCounts<i32> = view.iter().filter_map(|r| r.birth_year).collect();
    Some(summarize_birth_years(&years))
}

fn summarize_birth_years(years: &ValueCounts<i32>) -> Result<BirthYearStats> {
    let empty = || BikeshareError::EmptyInput {
        statistic: "birth year statistics",
    };
    let earliest = *years.min_value().ok_or_else(empty)?;
    let most_recent = *years.max_value().ok_or_else(empty)?;

    Ok(BirthYearStats {
        earliest,
        most_recent,
        most_common: years.require_mode("most common birth year")?,
    })
}

/// All demographic statistics for a view.
pub fn user_stats(view: &FilteredView<'_>) -> Result<UserStats> {
    let genders = match gender_counts(view) {
        Some(counts) => Statistic::Value(counts),
        None => Statistic::NotApplicable,
    };
    let birth_years = match birth_year_stats(view) {
        Some(result) => Statistic::capture(result)?,
        None => Statistic::NotApplicable,
    };

    Ok(UserStats {
        user_types: user_type_counts(view),
        genders,
        birth_years,
    })
}
