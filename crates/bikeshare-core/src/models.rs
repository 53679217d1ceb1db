use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bucket name for categorical cells that are empty in the source. The
/// parentheses keep it apart from any value a trip file actually carries.
pub const MISSING_BUCKET: &str = "(missing)";

/// Day of the week a trip started on.
///
/// Ordering follows the calendar week starting on Monday, which is also the
/// order used to break ties between equally frequent weekdays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// All seven days, Monday first.
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    /// Capitalised full name, e.g. `"Monday"`.
    pub fn name(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }

    /// Case-insensitive lookup by full name (`"monday"`, `"SUNDAY"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim();
        Self::ALL
            .into_iter()
            .find(|day| day.name().eq_ignore_ascii_case(wanted))
    }
}

impl From<chrono::Weekday> for DayOfWeek {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => DayOfWeek::Monday,
            chrono::Weekday::Tue => DayOfWeek::Tuesday,
            chrono::Weekday::Wed => DayOfWeek::Wednesday,
            chrono::Weekday::Thu => DayOfWeek::Thursday,
            chrono::Weekday::Fri => DayOfWeek::Friday,
            chrono::Weekday::Sat => DayOfWeek::Saturday,
            chrono::Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single trip read from a city's CSV file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    /// When the trip started (local time of the source, no offset).
    pub start_time: NaiveDateTime,
    /// When the trip ended, if the source carries it.
    pub end_time: Option<NaiveDateTime>,
    pub start_station: String,
    pub end_station: String,
    /// Duration in seconds; never negative.
    pub trip_duration: f64,
    /// `None` when the cell is empty.
    pub user_type: Option<String>,
    /// Always `None` when the dataset has no `Gender` column.
    pub gender: Option<String>,
    /// Always `None` when the dataset has no `Birth Year` column.
    pub birth_year: Option<i32>,
    /// Calendar month of `start_time`, 1-based.
    pub month: u32,
    pub day_of_week: DayOfWeek,
    /// Hour of `start_time`, 0-23.
    pub hour: u32,
}

impl TripRecord {
    /// Build a record, deriving `month`, `day_of_week` and `hour` from
    /// `start_time`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        start_time: NaiveDateTime,
        end_time: Option<NaiveDateTime>,
        start_station: impl Into<String>,
        end_station: impl Into<String>,
        trip_duration: f64,
        user_type: Option<String>,
        gender: Option<String>,
        birth_year: Option<i32>,
    ) -> Self {
        Self {
            month: start_time.month(),
            day_of_week: start_time.weekday().into(),
            hour: start_time.hour(),
            start_time,
            end_time,
            start_station: start_station.into(),
            end_station: end_station.into(),
            trip_duration,
            user_type,
            gender,
            birth_year,
        }
    }
}

/// Which optional columns a dataset's source file carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub has_end_time: bool,
    pub has_gender: bool,
    pub has_birth_year: bool,
}

/// Every trip of one city, in source order. Immutable after load.
#[derive(Debug, Clone)]
pub struct Dataset {
    city: String,
    schema: Schema,
    records: Vec<TripRecord>,
}

impl Dataset {
    pub fn new(city: impl Into<String>, schema: Schema, records: Vec<TripRecord>) -> Self {
        Self {
            city: city.into(),
            schema,
            records,
        }
    }

    /// Catalog key of the city this dataset was loaded for.
    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// An unrestricted view over every record.
    pub fn view(&self) -> FilteredView<'_> {
        FilteredView {
            schema: self.schema,
            records: self.records.iter().collect(),
        }
    }
}

/// A borrowed, order-preserving subset of a [`Dataset`].
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    schema: Schema,
    records: Vec<&'a TripRecord>,
}

impl<'a> FilteredView<'a> {
    pub fn schema(&self) -> Schema {
        self.schema
    }

    pub fn records(&self) -> &[&'a TripRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a TripRecord> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Keep only the records for which `keep` returns `true`.
    pub fn retain_matching(&self, keep: impl Fn(&TripRecord) -> bool) -> FilteredView<'a> {
        FilteredView {
            schema: self.schema,
            records: self.iter().filter(|r| keep(r)).collect(),
        }
    }

    /// `true` when both views hold the same records (by identity) in the
    /// same order.
    pub fn same_records(&self, other: &FilteredView<'_>) -> bool {
        self.records.len() == other.records.len()
            && self
                .records
                .iter()
                .zip(&other.records)
                .all(|(a, b)| std::ptr::eq(*a, *b))
    }
}

/// How many records carry a given categorical value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

/// Outcome of one named statistic.
///
/// `EmptyInput` scopes an empty-data failure to this statistic alone so the
/// rest of a report can still be produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Statistic<T> {
    Value(T),
    NotApplicable,
    EmptyInput(String),
}

impl<T> Statistic<T> {
    /// Capture an aggregation result, keeping `EmptyInput` as a marker and
    /// propagating any other error.
    pub fn capture(result: crate::error::Result<T>) -> crate::error::Result<Self> {
        match result {
            Ok(value) => Ok(Statistic::Value(value)),
            Err(crate::error::BikeshareError::EmptyInput { statistic }) => {
                Ok(Statistic::EmptyInput(statistic.to_string()))
            }
            Err(other) => Err(other),
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Statistic::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_not_applicable(&self) -> bool {
        matches!(self, Statistic::NotApplicable)
    }

    pub fn is_empty_input(&self) -> bool {
        matches!(self, Statistic::EmptyInput(_))
    }
}
