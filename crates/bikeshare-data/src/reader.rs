//! CSV loading for bikeshare trip files.
//!
//! Resolves a city through the [`Catalog`], parses every row of its CSV file
//! into a [`TripRecord`] and reports which optional columns the file carries.
//! A single bad row aborts the whole load: every statistic depends on the
//! calendar fields derived here.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use bikeshare_core::catalog::{Catalog, MONTH_TOKENS};
use bikeshare_core::error::{BikeshareError, Result};
use bikeshare_core::models::{Dataset, Schema, TripRecord};
use bikeshare_core::time_utils::parse_timestamp;
use tracing::debug;

// ── Column names ──────────────────────────────────────────────────────────────

const START_TIME: &str = "Start Time";
const END_TIME: &str = "End Time";
const TRIP_DURATION: &str = "Trip Duration";
const START_STATION: &str = "Start Station";
const END_STATION: &str = "End Station";
const USER_TYPE: &str = "User Type";
const GENDER: &str = "Gender";
const BIRTH_YEAR: &str = "Birth Year";

// ── Public API ────────────────────────────────────────────────────────────────

/// Loads city datasets using an injected, read-only [`Catalog`].
pub struct DatasetLoader<'a> {
    catalog: &'a Catalog,
}

impl<'a> DatasetLoader<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Read and parse the CSV file of `city`.
    ///
    /// Fails with `UnknownCity` when the catalog does not list the city,
    /// `SourceUnavailable` when its file cannot be opened or read, and
    /// `MalformedRecord` on the first row that cannot be parsed.
    pub fn load(&self, city: &str) -> Result<Dataset> {
        let entry = self.catalog.resolve(city)?;
        let path = self.catalog.source_path(entry);
        let file = open_source(&path)?;

        let dataset = parse_dataset(&entry.key, BufReader::new(file))
            .map_err(|err| unavailable_on_io(err, &path))?;

        debug!(
            "Loaded {} trips for {} from {} (schema: {:?})",
            dataset.len(),
            entry.name,
            path.display(),
            dataset.schema()
        );

        Ok(dataset)
    }
}

/// Parse trip rows from any CSV source.
///
/// The header row is looked up by name; unknown columns (such as the unnamed
/// index column of the city exports) are ignored.
pub fn parse_dataset<R: Read>(city: &str, source: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers().map_err(|e| csv_error(e, 1))?.clone();
    let columns = Columns::locate(&headers)?;

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: 1-based lines plus the header row.
        let fallback_line = idx as u64 + 2;
        let row = result.map_err(|e| csv_error(e, fallback_line))?;
        let line = row
            .position()
            .map(|p| p.line())
            .unwrap_or(fallback_line);
        records.push(columns.parse_row(&row, line)?);
    }

    Ok(Dataset::new(city, columns.schema(), records))
}

/// Streams raw CSV rows of a city file, a page at a time.
pub struct RawRowPager {
    path: PathBuf,
    headers: Vec<String>,
    rows: csv::StringRecordsIntoIter<BufReader<File>>,
    exhausted: bool,
}

impl RawRowPager {
    /// Open `path` and read its header row.
    pub fn open(path: &Path) -> Result<Self> {
        let file = open_source(path)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(BufReader::new(file));
        let headers = reader
            .headers()
            .map_err(|e| unavailable_on_io(csv_error(e, 1), path))?
            .iter()
            .map(str::to_string)
            .collect();

        Ok(Self {
            path: PathBuf::from(path),
            headers,
            rows: reader.into_records(),
            exhausted: false,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Next `size` rows as raw strings; fewer (or none) once the file ends.
    pub fn next_page(&mut self, size: usize) -> Result<Vec<Vec<String>>> {
        let mut page = Vec::with_capacity(size);
        while page.len() < size && !self.exhausted {
            match self.rows.next() {
                Some(row) => {
                    let row =
                        row.map_err(|e| unavailable_on_io(csv_error(e, 0), &self.path))?;
                    page.push(row.iter().map(str::to_string).collect());
                }
                None => self.exhausted = true,
            }
        }
        Ok(page)
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn open_source(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| BikeshareError::SourceUnavailable {
        path: PathBuf::from(path),
        source,
    })
}

/// Attach `path` to a read failure that surfaced while parsing.
fn unavailable_on_io(err: BikeshareError, path: &Path) -> BikeshareError {
    match err {
        BikeshareError::Io(source) => BikeshareError::SourceUnavailable {
            path: PathBuf::from(path),
            source,
        },
        other => other,
    }
}

/// Turn a `csv` error into a pipeline error, preferring the line number the
/// parser reports.
fn csv_error(err: csv::Error, fallback_line: u64) -> BikeshareError {
    let line = err.position().map(|p| p.line()).unwrap_or(fallback_line);
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(io) => BikeshareError::Io(io),
        _ => BikeshareError::malformed(line, message),
    }
}

/// Positions of the known columns within the header row.
struct Columns {
    start_time: usize,
    end_time: Option<usize>,
    trip_duration: usize,
    start_station: usize,
    end_station: usize,
    user_type: usize,
    gender: Option<usize>,
    birth_year: Option<usize>,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| {
                BikeshareError::malformed(1, format!("missing required column \"{name}\""))
            })
        };

        Ok(Self {
            start_time: require(START_TIME)?,
            end_time: find(END_TIME),
            trip_duration: require(TRIP_DURATION)?,
            start_station: require(START_STATION)?,
            end_station: require(END_STATION)?,
            user_type: require(USER_TYPE)?,
            gender: find(GENDER),
            birth_year: find(BIRTH_YEAR),
        })
    }

    fn schema(&self) -> Schema {
        Schema {
            has_end_time: self.end_time.is_some(),
            has_gender: self.gender.is_some(),
            has_birth_year: self.birth_year.is_some(),
        }
    }

    fn parse_row(&self, row: &csv::StringRecord, line: u64) -> Result<TripRecord> {
        let cell = |idx: usize| row.get(idx).unwrap_or("");
        let optional_cell = |idx: Option<usize>| {
            idx.map(cell)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let start_raw = cell(self.start_time);
        let start_time = parse_timestamp(start_raw).ok_or_else(|| {
            BikeshareError::malformed(line, format!("unparseable {START_TIME} \"{start_raw}\""))
        })?;

        let end_time = match optional_cell(self.end_time) {
            Some(raw) => Some(parse_timestamp(&raw).ok_or_else(|| {
                BikeshareError::malformed(line, format!("unparseable {END_TIME} \"{raw}\""))
            })?),
            None => None,
        };

        let record = TripRecord::new(
            start_time,
            end_time,
            required_text(cell(self.start_station), START_STATION, line)?,
            required_text(cell(self.end_station), END_STATION, line)?,
            parse_duration(cell(self.trip_duration), line)?,
            optional_cell(Some(self.user_type)),
            optional_cell(self.gender),
            match optional_cell(self.birth_year) {
                Some(raw) => Some(parse_birth_year(&raw, line)?),
                None => None,
            },
        );

        if record.month == 0 || record.month as usize > MONTH_TOKENS.len() {
            return Err(BikeshareError::malformed(
                line,
                format!("{START_TIME} {start_time} falls outside January-June"),
            ));
        }

        Ok(record)
    }
}

fn required_text(value: &str, column: &str, line: u64) -> Result<String> {
    if value.is_empty() {
        return Err(BikeshareError::malformed(line, format!("empty {column}")));
    }
    Ok(value.to_string())
}

fn parse_duration(raw: &str, line: u64) -> Result<f64> {
    match raw.parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs >= 0.0 => Ok(secs),
        _ => Err(BikeshareError::malformed(
            line,
            format!("invalid {TRIP_DURATION} \"{raw}\""),
        )),
    }
}

/// Birth years are exported as floats (`1989.0`); only whole years are valid.
fn parse_birth_year(raw: &str, line: u64) -> Result<i32> {
    match raw.parse::<f64>() {
        Ok(year) if year.fract() == 0.0 && (0.0..=9999.0).contains(&year) => Ok(year as i32),
        _ => Err(BikeshareError::malformed(
            line,
            format!("invalid {BIRTH_YEAR} \"{raw}\""),
        )),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use bikeshare_core::models::DayOfWeek;
    use tempfile::TempDir;

    // ── Helpers ───────────────────────────────────────────────────────────────

    const CHICAGO_HEADER: &str =
        ",Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year";
    const WASHINGTON_HEADER: &str =
        ",Start Time,End Time,Trip Duration,Start Station,End Station,User Type";

    fn write_csv(dir: &Path, name: &str, header: &str, rows: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut content = String::from(header);
        content.push('\n');
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    fn chicago_rows() -> Vec<&'static str> {
        vec![
            "1423854,2017-06-23 15:09:32,2017-06-23 15:14:53,321,Wood St & Hubbard St,Damen Ave & Chicago Ave,Subscriber,Male,1992.0",
            "955915,2017-05-25 18:19:03,2017-05-25 18:45:53,1610,Theater on the Lake,Sheffield Ave & Waveland Ave,Subscriber,Female,1992.0",
            "9031,2017-01-04 08:27:49,2017-01-04 08:34:45,416,May St & Taylor St,Wood St & Taylor St,Subscriber,Male,1981.0",
            "304487,2017-03-06 13:49:38,2017-03-06 13:55:28,350,Christiana Ave & Lawrence Ave,St. Louis Ave & Balmoral Ave,Customer,,",
        ]
    }

    fn parse(header: &str, rows: &[&str]) -> Result<Dataset> {
        let mut content = String::from(header);
        for row in rows {
            content.push('\n');
            content.push_str(row);
        }
        parse_dataset("test", content.as_bytes())
    }

    // ── DatasetLoader ─────────────────────────────────────────────────────────

    #[test]
    fn test_load_city_with_demographics() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "chicago.csv", CHICAGO_HEADER, &chicago_rows());
        let catalog = Catalog::standard(dir.path());

        let dataset = DatasetLoader::new(&catalog).load("Chicago").unwrap();

        assert_eq!(dataset.city(), "chicago");
        assert_eq!(dataset.len(), 4);
        assert!(dataset.schema().has_gender);
        assert!(dataset.schema().has_birth_year);
        assert!(dataset.schema().has_end_time);

        let first = &dataset.records()[0];
        assert_eq!(first.month, 6);
        assert_eq!(first.day_of_week, DayOfWeek::Friday);
        assert_eq!(first.hour, 15);
        assert_eq!(first.start_station, "Wood St & Hubbard St");
        assert_eq!(first.trip_duration, 321.0);
        assert_eq!(first.birth_year, Some(1992));
        assert_eq!(first.gender.as_deref(), Some("Male"));

        let last = &dataset.records()[3];
        assert_eq!(last.user_type.as_deref(), Some("Customer"));
        assert!(last.gender.is_none());
        assert!(last.birth_year.is_none());
    }

    #[test]
    fn test_load_city_without_demographics() {
        let dir = TempDir::new().unwrap();
        write_csv(
            dir.path(),
            "washington.csv",
            WASHINGTON_HEADER,
            &["1621326,2017-06-21 08:36:34,2017-06-21 08:44:43,489.066,14th & Belmont St NW,15th & K St NW,Subscriber"],
        );
        let catalog = Catalog::standard(dir.path());

        let dataset = DatasetLoader::new(&catalog).load("washington").unwrap();

        assert!(!dataset.schema().has_gender);
        assert!(!dataset.schema().has_birth_year);
        assert!((dataset.records()[0].trip_duration - 489.066).abs() < 1e-9);
    }

    #[test]
    fn test_load_unknown_city() {
        let catalog = Catalog::standard("/nowhere");
        let err = DatasetLoader::new(&catalog).load("atlantis").unwrap_err();
        assert!(matches!(err, BikeshareError::UnknownCity(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let catalog = Catalog::standard(dir.path());
        let err = DatasetLoader::new(&catalog).load("chicago").unwrap_err();
        match err {
            BikeshareError::SourceUnavailable { path, .. } => {
                assert_eq!(path, dir.path().join("chicago.csv"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_unreadable_file_names_path() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("chicago.csv")).unwrap();
        let catalog = Catalog::standard(dir.path());

        let err = DatasetLoader::new(&catalog).load("chicago").unwrap_err();
        match err {
            BikeshareError::SourceUnavailable { path, .. } => {
                assert_eq!(path, dir.path().join("chicago.csv"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_derived_fields_in_range() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "chicago.csv", CHICAGO_HEADER, &chicago_rows());
        let catalog = Catalog::standard(dir.path());

        let dataset = DatasetLoader::new(&catalog).load("chicago").unwrap();

        for record in dataset.records() {
            assert!((1..=6).contains(&record.month));
            assert!(record.hour <= 23);
            assert!(DayOfWeek::from_name(record.day_of_week.name()).is_some());
        }
    }

    // ── parse_dataset ─────────────────────────────────────────────────────────

    #[test]
    fn test_parse_preserves_source_order() {
        let dataset = parse(CHICAGO_HEADER, &chicago_rows()).unwrap();
        let months: Vec<u32> = dataset.records().iter().map(|r| r.month).collect();
        assert_eq!(months, vec![6, 5, 1, 3]);
    }

    #[test]
    fn test_parse_bad_timestamp_aborts_load() {
        let err = parse(
            CHICAGO_HEADER,
            &[
                chicago_rows()[0],
                "1,not-a-date,,300,A,B,Subscriber,Male,1990",
            ],
        )
        .unwrap_err();
        match err {
            BikeshareError::MalformedRecord { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("Start Time"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_empty_start_time_is_malformed() {
        let err = parse(CHICAGO_HEADER, &["1,,,300,A,B,Subscriber,Male,1990"]).unwrap_err();
        assert!(matches!(err, BikeshareError::MalformedRecord { line: 2, .. }));
    }

    #[test]
    fn test_parse_negative_duration_is_malformed() {
        let err = parse(
            CHICAGO_HEADER,
            &["1,2017-01-02 10:00:00,,-5,A,B,Subscriber,Male,1990"],
        )
        .unwrap_err();
        match err {
            BikeshareError::MalformedRecord { reason, .. } => {
                assert!(reason.contains("Trip Duration"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_fractional_birth_year_is_malformed() {
        let err = parse(
            CHICAGO_HEADER,
            &["1,2017-01-02 10:00:00,,60,A,B,Subscriber,Male,1990.5"],
        )
        .unwrap_err();
        assert!(matches!(err, BikeshareError::MalformedRecord { .. }));
    }

    #[test]
    fn test_parse_month_outside_coverage_is_malformed() {
        let err = parse(
            CHICAGO_HEADER,
            &["1,2017-07-02 10:00:00,,60,A,B,Subscriber,Male,1990"],
        )
        .unwrap_err();
        assert!(matches!(err, BikeshareError::MalformedRecord { line: 2, .. }));
    }

    #[test]
    fn test_parse_missing_required_column() {
        let err = parse("Start Time,Start Station,End Station,User Type", &[]).unwrap_err();
        match err {
            BikeshareError::MalformedRecord { line, reason } => {
                assert_eq!(line, 1);
                assert!(reason.contains("Trip Duration"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_header_only_yields_empty_dataset() {
        let dataset = parse(CHICAGO_HEADER, &[]).unwrap();
        assert!(dataset.is_empty());
        assert!(dataset.schema().has_gender);
    }

    #[test]
    fn test_parse_empty_user_type_is_none() {
        let dataset = parse(
            WASHINGTON_HEADER,
            &["1,2017-02-02 10:00:00,2017-02-02 10:05:00,300,A,B,"],
        )
        .unwrap();
        assert!(dataset.records()[0].user_type.is_none());
    }

    #[test]
    fn test_parse_ragged_row_is_malformed() {
        let err = parse(WASHINGTON_HEADER, &["1,2017-02-02 10:00:00"]).unwrap_err();
        assert!(matches!(err, BikeshareError::MalformedRecord { .. }));
    }

    // ── RawRowPager ───────────────────────────────────────────────────────────

    #[test]
    fn test_raw_pager_pages_through_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "chicago.csv", CHICAGO_HEADER, &chicago_rows());

        let mut pager = RawRowPager::open(&path).unwrap();
        assert_eq!(pager.headers()[1], "Start Time");

        let first = pager.next_page(3).unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(first[0][0], "1423854");
        assert!(!pager.is_exhausted());

        let second = pager.next_page(3).unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0][0], "304487");
        assert!(pager.is_exhausted());

        assert!(pager.next_page(3).unwrap().is_empty());
    }

    #[test]
    fn test_raw_pager_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = RawRowPager::open(&dir.path().join("none.csv")).err().unwrap();
        assert!(matches!(err, BikeshareError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_raw_pager_unreadable_file_names_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("washington.csv");
        std::fs::create_dir(&path).unwrap();

        let err = RawRowPager::open(&path).err().unwrap();
        assert!(matches!(err, BikeshareError::SourceUnavailable { .. }));
    }
}
