//! Most frequent times of travel.

use bikeshare_core::error::{BikeshareError, Result};
use bikeshare_core::models::{DayOfWeek, FilteredView};
use serde::Serialize;

use crate::aggregator::{Mode, ValueCounts};

/// Most common month, weekday and start hour of a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeStats {
    /// 1-based month number.
    pub month: Mode<u32>,
    pub day_of_week: Mode<DayOfWeek>,
    /// Hour of day, 0-23.
    pub hour: Mode<u32>,
}

/// Compute the time-of-travel modes.
///
/// Ties go to the earliest month, the earliest weekday (Monday first) and
/// the earliest hour. Fails with `EmptyInput` on an empty view.
pub fn time_stats(view: &FilteredView<'_>) -> Result<TimeStats> {
    if view.is_empty() {
        return Err(BikeshareError::EmptyInput {
            statistic: "most frequent times of travel",
        });
    }

    let mut months = ValueCounts::new();
    let mut days = ValueCounts::new();
    let mut hours = ValueCounts::new();
    for record in view.iter() {
        months.add(record.month);
        days.add(record.day_of_week);
        hours.add(record.hour);
    }

    Ok(TimeStats {
        month: months.require_mode("most common month")?,
        day_of_week: days.require_mode("most common day of week")?,
        hour: hours.require_mode("most common start hour")?,
    })
}
