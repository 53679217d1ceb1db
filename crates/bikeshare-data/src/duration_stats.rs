//! Total and average trip duration.

use bikeshare_core::error::{BikeshareError, Result};
use bikeshare_core::models::{FilteredView, Statistic};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    /// Sum of all durations in seconds; 0 for an empty view.
    pub total_seconds: f64,
    pub mean_seconds: Statistic<f64>,
    pub trips: usize,
}

/// Sum of `trip_duration` over the view, in seconds.
pub fn total_duration(view: &FilteredView<'_>) -> f64 {
    view.iter().fold(0.0, |acc, r| acc + r.trip_duration)
}

/// Arithmetic mean of `trip_duration`. Fails with `EmptyInput` on an empty
/// view.
pub fn mean_duration(view: &FilteredView<'_>) -> Result<f64> {
    if view.is_empty() {
        return Err(BikeshareError::EmptyInput {
            statistic: "mean travel time",
        });
    }
    Ok(total_duration(view) / view.len() as f64)
}

pub fn duration_stats(view: &FilteredView<'_>) -> Result<DurationStats> {
    Ok(DurationStats {
        total_seconds: total_duration(view),
        mean_seconds: Statistic::capture(mean_duration(view))?,
        trips: view.len(),
    })
}
