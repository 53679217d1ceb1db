use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Naive layouts seen in trip exports, tried in order.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Parse a trip timestamp into a wall-clock [`NaiveDateTime`].
///
/// Accepts the `YYYY-MM-DD HH:MM:SS` layout used by the city exports (with
/// optional fractional seconds or a `T` separator), US-style
/// `MM/DD/YYYY HH:MM[:SS]`, and RFC 3339 strings. An RFC 3339 offset is
/// dropped and the local wall-clock time kept, since every derived field is
/// a local calendar value.
///
/// Returns `None` for empty strings or unrecognised formats.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    // Date-only values start at midnight.
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Elapsed wall-clock seconds since `start`.
pub fn seconds_since(start: std::time::Instant) -> f64 {
    start.elapsed().as_secs_f64()
}
