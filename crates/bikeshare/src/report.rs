//! Plain-text rendering of query reports and raw CSV pages.

use bikeshare_core::formatting::{
    capitalize, format_count, format_duration, format_hour, format_number, month_name, percentage,
};
use bikeshare_core::models::{CategoryCount, Statistic};
use bikeshare_data::QueryReport;

const RULE: &str = "----------------------------------------";

// ── Report ─────────────────────────────────────────────────────────────────────

/// Render `report` as the multi-section text shown in the terminal.
pub fn render_text(report: &QueryReport) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "{} (month: {}, day: {})",
        capitalize(&report.city),
        report.filter.month,
        report.filter.day
    ));
    lines.push(format!(
        "Trips matched: {} of {} ({}%)",
        format_count(report.records_matched),
        format_count(report.records_loaded),
        format_number(percentage(report.records_matched, report.records_loaded), 1)
    ));
    lines.push(RULE.to_string());

    lines.push("Most frequent times of travel".to_string());
    match &report.time {
        Statistic::Value(time) => {
            lines.push(format!(
                "  Month:       {} ({} trips)",
                month_name(time.month.value),
                format_count(time.month.count)
            ));
            lines.push(format!(
                "  Day of week: {} ({} trips)",
                time.day_of_week.value,
                format_count(time.day_of_week.count)
            ));
            lines.push(format!(
                "  Start hour:  {} ({} trips)",
                format_hour(time.hour.value),
                format_count(time.hour.count)
            ));
        }
        other => lines.push(unavailable(other)),
    }
    lines.push(took(report.metadata.time_stats_seconds));
    lines.push(RULE.to_string());

    lines.push("Most popular stations and trip".to_string());
    match &report.stations {
        Statistic::Value(stations) => {
            lines.push(format!(
                "  Start station: {} ({} trips)",
                stations.start_station.value,
                format_count(stations.start_station.count)
            ));
            lines.push(format!(
                "  End station:   {} ({} trips)",
                stations.end_station.value,
                format_count(stations.end_station.count)
            ));
            lines.push(format!(
                "  Trip:          {} -> {} ({} trips)",
                stations.trip.value.start,
                stations.trip.value.end,
                format_count(stations.trip.count)
            ));
        }
        other => lines.push(unavailable(other)),
    }
    lines.push(took(report.metadata.station_stats_seconds));
    lines.push(RULE.to_string());

    lines.push("Trip duration".to_string());
    let durations = &report.durations;
    lines.push(format!(
        "  Total travel time: {} ({} s)",
        format_duration(durations.total_seconds),
        format_number(durations.total_seconds, 0)
    ));
    match &durations.mean_seconds {
        Statistic::Value(mean) => lines.push(format!(
            "  Mean travel time:  {} ({} s)",
            format_duration(*mean),
            format_number(*mean, 1)
        )),
        other => lines.push(unavailable(other)),
    }
    lines.push(took(report.metadata.duration_stats_seconds));
    lines.push(RULE.to_string());

    lines.push("User statistics".to_string());
    lines.push("  User types:".to_string());
    if report.users.user_types.is_empty() {
        lines.push("    (none)".to_string());
    }
    lines.extend(category_lines(&report.users.user_types));

    match &report.users.genders {
        Statistic::Value(genders) => {
            lines.push("  Gender:".to_string());
            lines.extend(category_lines(genders));
        }
        other => lines.push(format!("  Gender: {}", reason(other))),
    }

    match &report.users.birth_years {
        Statistic::Value(years) => {
            lines.push(format!("  Earliest birth year:    {}", years.earliest));
            lines.push(format!("  Most recent birth year: {}", years.most_recent));
            lines.push(format!(
                "  Most common birth year: {} ({} riders)",
                years.most_common.value,
                format_count(years.most_common.count)
            ));
        }
        other => lines.push(format!("  Birth year: {}", reason(other))),
    }
    lines.push(took(report.metadata.user_stats_seconds));
    lines.push(RULE.to_string());

    lines.join("\n")
}

fn category_lines(categories: &[CategoryCount]) -> impl Iterator<Item = String> + '_ {
    categories
        .iter()
        .map(|c| format!("    {}: {}", c.value, format_count(c.count)))
}

fn took(seconds: f64) -> String {
    format!("This took {} seconds.", format_number(seconds, 4))
}

fn unavailable<T>(statistic: &Statistic<T>) -> String {
    format!("  {}", reason(statistic))
}

fn reason<T>(statistic: &Statistic<T>) -> String {
    match statistic {
        Statistic::Value(_) => String::new(),
        Statistic::NotApplicable => "not available for this city".to_string(),
        Statistic::EmptyInput(name) => format!("no trips match the filters ({name})"),
    }
}

// ── Raw rows ───────────────────────────────────────────────────────────────────

/// Render raw CSV rows as `header: value` blocks separated by blank lines.
pub fn render_raw_rows(headers: &[String], rows: &[Vec<String>]) -> String {
    rows.iter()
        .map(|row| {
            headers
                .iter()
                .zip(row.iter())
                .map(|(header, value)| {
                    let header = if header.is_empty() { "#" } else { header.as_str() };
                    format!("{header}: {value}")
                })
                .collect::<Vec<String>>()
                .join("\n")
        })
        .collect::<Vec<String>>()
        .join("\n\n")
}

// ── Tests ──────────────────────────────────────────────────────────────────────
