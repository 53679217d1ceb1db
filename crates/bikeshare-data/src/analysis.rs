//! Query pipeline for the bikeshare explorer.
//!
//! Loads one city, applies the month/day filter and runs the four
//! statistics modules over the filtered view, returning a [`QueryReport`]
//! for the caller to render.

use std::time::Instant;

use bikeshare_core::catalog::Catalog;
use bikeshare_core::error::Result;
use bikeshare_core::models::{Dataset, Schema, Statistic};
use bikeshare_core::time_utils::seconds_since;
use chrono::Local;
use serde::Serialize;
use tracing::info;

use crate::duration_stats::{duration_stats, DurationStats};
use crate::filter::{FilterSummary, TripFilter};
use crate::reader::DatasetLoader;
use crate::station_stats::{station_stats, StationStats};
use crate::time_stats::{time_stats, TimeStats};
use crate::user_stats::{user_stats, UserStats};

// ── Public types ──────────────────────────────────────────────────────────────

/// Timing information produced alongside a report.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryMetadata {
    /// ISO-8601 timestamp when this report was generated.
    pub generated_at: String,
    /// Wall-clock seconds spent reading and parsing the CSV file.
    pub load_time_seconds: f64,
    pub filter_time_seconds: f64,
    pub time_stats_seconds: f64,
    pub station_stats_seconds: f64,
    pub duration_stats_seconds: f64,
    pub user_stats_seconds: f64,
}

/// The complete output of one query.
#[derive(Debug, Clone, Serialize)]
pub struct QueryReport {
    /// Catalog key of the city.
    pub city: String,
    pub filter: FilterSummary,
    pub schema: Schema,
    /// Trips in the city's file.
    pub records_loaded: usize,
    /// Trips left after filtering.
    pub records_matched: usize,
    pub time: Statistic<TimeStats>,
    pub stations: Statistic<StationStats>,
    pub durations: DurationStats,
    pub users: UserStats,
    pub metadata: QueryMetadata,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the full pipeline for `city` restricted to `month` and `day`.
///
/// 1. Load the city's dataset through a [`DatasetLoader`] over `catalog`.
/// 2. Parse the filter tokens (`"all"` or a month/weekday name).
/// 3. Run the four statistics modules via [`analyze_dataset`].
///
/// Load and filter errors abort the query. An empty filtered view does not:
/// the affected statistics carry [`Statistic::EmptyInput`] instead.
pub fn run_query(catalog: &Catalog, city: &str, month: &str, day: &str) -> Result<QueryReport> {
    let load_start = Instant::now();
    let dataset = DatasetLoader::new(catalog).load(city)?;
    let load_time = seconds_since(load_start);

    let trip_filter = TripFilter::parse(month, day)?;

    let mut report = analyze_dataset(&dataset, &trip_filter)?;
    report.metadata.load_time_seconds = load_time;
    Ok(report)
}

/// Filter an already-loaded dataset and compute every statistic.
pub fn analyze_dataset(dataset: &Dataset, trip_filter: &TripFilter) -> Result<QueryReport> {
    let mut metadata = QueryMetadata {
        generated_at: Local::now().to_rfc3339(),
        ..QueryMetadata::default()
    };

    let start = Instant::now();
    let view = trip_filter.apply(&dataset.view());
    metadata.filter_time_seconds = seconds_since(start);

    let start = Instant::now();
    let time = Statistic::capture(time_stats(&view))?;
    metadata.time_stats_seconds = seconds_since(start);

    let start = Instant::now();
    let stations = Statistic::capture(station_stats(&view))?;
    metadata.station_stats_seconds = seconds_since(start);

    let start = Instant::now();
    let durations = duration_stats(&view)?;
    metadata.duration_stats_seconds = seconds_since(start);

    let start = Instant::now();
    let users = user_stats(&view)?;
    metadata.user_stats_seconds = seconds_since(start);

    let filter = trip_filter.describe();
    info!(
        "Analysed {} of {} trips for {} (month: {}, day: {})",
        view.len(),
        dataset.len(),
        dataset.city(),
        filter.month,
        filter.day
    );

    Ok(QueryReport {
        city: dataset.city().to_string(),
        filter,
        schema: dataset.schema(),
        records_loaded: dataset.len(),
        records_matched: view.len(),
        time,
        stations,
        durations,
        users,
        metadata,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use bikeshare_core::error::BikeshareError;
    use bikeshare_core::models::DayOfWeek;
    use std::path::Path;
    use tempfile::TempDir;

    const HEADER: &str =
        ",Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year";

    fn write_city(dir: &Path, file: &str, header: &str, rows: &[&str]) {
        let mut content = String::from(header);
        for row in rows {
            content.push('\n');
            content.push_str(row);
        }
        std::fs::write(dir.join(file), content).unwrap();
    }

    fn chicago(dir: &Path) {
        write_city(
            dir,
            "chicago.csv",
            HEADER,
            &[
                // Mon Jan 2
                "1,2017-01-02 08:10:00,2017-01-02 08:15:00,100,Canal St,Clark St,Subscriber,Male,1980.0",
                // Fri Jan 6
                "2,2017-01-06 17:00:00,2017-01-06 17:20:00,200,Canal St,Clark St,Subscriber,Female,1990.0",
                // Fri Mar 3
                "3,2017-03-03 17:30:00,2017-03-03 17:40:00,300,Wells St,Canal St,Customer,,",
            ],
        );
    }

    #[test]
    fn test_run_query_all_filters() {
        let dir = TempDir::new().unwrap();
        chicago(dir.path());
        let catalog = Catalog::standard(dir.path());

        let report = run_query(&catalog, "chicago", "all", "all").unwrap();

        assert_eq!(report.city, "chicago");
        assert_eq!(report.records_loaded, 3);
        assert_eq!(report.records_matched, 3);

        let time = report.time.value().unwrap();
        assert_eq!(time.month.value, 1);
        assert_eq!(time.day_of_week.value, DayOfWeek::Friday);
        assert_eq!(time.hour.value, 17);

        let stations = report.stations.value().unwrap();
        assert_eq!(stations.start_station.value, "Canal St");
        assert_eq!(stations.trip.value.end, "Clark St");

        assert_eq!(report.durations.total_seconds, 600.0);
        assert_eq!(report.durations.mean_seconds, Statistic::Value(200.0));

        assert_eq!(report.users.user_types[0].value, "Subscriber");
        let years = report.users.birth_years.value().unwrap();
        assert_eq!(years.earliest, 1980);
        assert_eq!(years.most_recent, 1990);
    }

    #[test]
    fn test_run_query_with_filters() {
        let dir = TempDir::new().unwrap();
        chicago(dir.path());
        let catalog = Catalog::standard(dir.path());

        let report = run_query(&catalog, "Chicago", "January", "friday").unwrap();

        assert_eq!(report.filter.month, "january");
        assert_eq!(report.filter.day, "Friday");
        assert_eq!(report.records_matched, 1);
        assert_eq!(report.durations.total_seconds, 200.0);
    }

    #[test]
    fn test_run_query_empty_view_keeps_other_statistics() {
        let dir = TempDir::new().unwrap();
        chicago(dir.path());
        let catalog = Catalog::standard(dir.path());

        let report = run_query(&catalog, "chicago", "june", "all").unwrap();

        assert_eq!(report.records_matched, 0);
        assert!(report.time.is_empty_input());
        assert!(report.stations.is_empty_input());
        assert_eq!(report.durations.total_seconds, 0.0);
        assert!(report.durations.mean_seconds.is_empty_input());
        assert!(report.users.user_types.is_empty());
        assert!(report.users.birth_years.is_empty_input());
    }

    #[test]
    fn test_run_query_city_without_demographics() {
        let dir = TempDir::new().unwrap();
        write_city(
            dir.path(),
            "washington.csv",
            ",Start Time,End Time,Trip Duration,Start Station,End Station,User Type",
            &["1,2017-04-04 09:00:00,2017-04-04 09:10:00,600.5,A St,B St,Customer"],
        );
        let catalog = Catalog::standard(dir.path());

        let report = run_query(&catalog, "washington", "all", "all").unwrap();

        assert!(report.users.genders.is_not_applicable());
        assert!(report.users.birth_years.is_not_applicable());
        assert_eq!(report.users.user_types.len(), 1);
    }

    #[test]
    fn test_run_query_unknown_city() {
        let catalog = Catalog::standard(".");
        let err = run_query(&catalog, "springfield", "all", "all").unwrap_err();
        assert!(matches!(err, BikeshareError::UnknownCity(_)));
    }

    #[test]
    fn test_run_query_invalid_filter_token() {
        let dir = TempDir::new().unwrap();
        chicago(dir.path());
        let catalog = Catalog::standard(dir.path());

        let err = run_query(&catalog, "chicago", "all", "someday").unwrap_err();
        assert!(matches!(err, BikeshareError::InvalidFilterToken { .. }));
    }

    #[test]
    fn test_run_query_malformed_file() {
        let dir = TempDir::new().unwrap();
        write_city(
            dir.path(),
            "chicago.csv",
            HEADER,
            &["1,garbage,,100,A,B,Subscriber,Male,1980"],
        );
        let catalog = Catalog::standard(dir.path());

        let err = run_query(&catalog, "chicago", "all", "all").unwrap_err();
        assert!(matches!(err, BikeshareError::MalformedRecord { line: 2, .. }));
    }

    #[test]
    fn test_report_serializes_to_json() {
        let dir = TempDir::new().unwrap();
        chicago(dir.path());
        let catalog = Catalog::standard(dir.path());

        let report = run_query(&catalog, "chicago", "june", "all").unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["city"], "chicago");
        assert_eq!(json["time"]["status"], "empty_input");
        assert_eq!(json["durations"]["total_seconds"], 0.0);
        assert_eq!(json["users"]["genders"]["status"], "value");
    }
}
