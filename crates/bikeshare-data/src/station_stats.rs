//! Most popular stations and trips.

use bikeshare_core::error::{BikeshareError, Result};
use bikeshare_core::models::FilteredView;
use serde::Serialize;

use crate::aggregator::{Mode, ValueCounts};

/// A start/end station combination.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct StationPair {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationStats {
    pub start_station: Mode<String>,
    pub end_station: Mode<String>,
    /// Most frequent (start, end) combination.
    pub trip: Mode<StationPair>,
}

/// Compute the station-popularity modes. Ties go to the lexically smallest
/// station (pairs: by start, then end). Fails with `EmptyInput` on an empty
/// view.
pub fn station_stats(view: &FilteredView<'_>) -> Result<StationStats> {
    if view.is_empty() {
        return Err(BikeshareError::EmptyInput {
            statistic: "most popular stations and trip",
        });
    }

    let mut starts: ValueCounts<&str> = ValueCounts::new();
    let mut ends: ValueCounts<&str> = ValueCounts::new();
    let mut pairs: ValueCounts<(&str, &str)> = ValueCounts::new();
    for record in view.iter() {
        starts.add(record.start_station.as_str());
        ends.add(record.end_station.as_str());
        pairs.add((record.start_station.as_str(), record.end_station.as_str()));
    }

    let owned = |mode: Mode<&str>| Mode {
        value: mode.value.to_string(),
        count: mode.count,
    };
    let trip = pairs.require_mode("most frequent trip")?;

    Ok(StationStats {
        start_station: owned(starts.require_mode("most common start station")?),
        end_station: owned(ends.require_mode("most common end station")?),
        trip: Mode {
            value: StationPair {
                start: trip.value.0.to_string(),
                end: trip.value.1.to_string(),
            },
            count: trip.count,
        },
    })
}
