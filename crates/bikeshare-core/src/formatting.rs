//! Text helpers for rendering statistics to people.

use crate::catalog::MONTH_TOKENS;

/// Format a number with thousands separators and a fixed number of decimal
/// places.
///
/// # Examples
///
/// ```
/// use bikeshare_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5, 1), "1,234.5");
/// assert_eq!(format_number(300_000.0, 0), "300,000");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (formatted.as_str(), None),
    };

    let mut out = String::new();
    if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Format a count of records with thousands separators.
///
/// ```
/// use bikeshare_core::formatting::format_count;
///
/// assert_eq!(format_count(1_551_505), "1,551,505");
/// ```
pub fn format_count(count: usize) -> String {
    group_thousands(&count.to_string())
}

/// Render a trip duration given in seconds as days/hours/minutes/seconds,
/// omitting leading zero units.
///
/// # Examples
///
/// ```
/// use bikeshare_core::formatting::format_duration;
///
/// assert_eq!(format_duration(0.0), "0s");
/// assert_eq!(format_duration(59.4), "59s");
/// assert_eq!(format_duration(754.0), "12m 34s");
/// assert_eq!(format_duration(3_600.0), "1h 0m 0s");
/// assert_eq!(format_duration(93_784.0), "1d 2h 3m 4s");
/// ```
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let secs = total % 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m {secs}s")
    } else if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

/// Capitalised month name for a 1-based month number within the covered
/// range, or the bare number otherwise.
///
/// ```
/// use bikeshare_core::formatting::month_name;
///
/// assert_eq!(month_name(1), "January");
/// assert_eq!(month_name(6), "June");
/// assert_eq!(month_name(9), "9");
/// ```
pub fn month_name(month: u32) -> String {
    month
        .checked_sub(1)
        .and_then(|idx| MONTH_TOKENS.get(idx as usize))
        .map(|token| capitalize(token))
        .unwrap_or_else(|| month.to_string())
}

/// Render an hour of day on the 24-hour clock, e.g. `17` → `"17:00"`.
pub fn format_hour(hour: u32) -> String {
    format!("{hour:02}:00")
}

/// `(part / whole) * 100`, or `0.0` when `whole` is zero.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

/// Upper-case the first letter of each space-separated word.
pub fn capitalize(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Insert commas every three digits from the right of a digit string.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut result = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_rounding() {
        assert_eq!(format_number(123.456, 2), "123.46");
        assert_eq!(format_number(999.999, 1), "1,000.0");
    }

    #[test]
    fn test_format_number_negative_zero_has_no_sign() {
        assert_eq!(format_number(-0.001, 1), "0.0");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(12_345_678), "12,345,678");
    }

    #[test]
    fn test_format_duration_rounds_to_seconds() {
        assert_eq!(format_duration(59.6), "1m 0s");
        assert_eq!(format_duration(-5.0), "0s");
    }

    #[test]
    fn test_format_duration_days() {
        assert_eq!(format_duration(2.0 * 86_400.0), "2d 0h 0m 0s");
    }

    #[test]
    fn test_month_name_out_of_range() {
        assert_eq!(month_name(0), "0");
        assert_eq!(month_name(3), "March");
    }

    #[test]
    fn test_format_hour() {
        assert_eq!(format_hour(0), "00:00");
        assert_eq!(format_hour(17), "17:00");
    }

    #[test]
    fn test_percentage() {
        assert!((percentage(1, 4) - 25.0).abs() < 1e-9);
        assert_eq!(percentage(3, 0), 0.0);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("new york city"), "New York City");
        assert_eq!(capitalize("june"), "June");
        assert_eq!(capitalize(""), "");
    }
}
