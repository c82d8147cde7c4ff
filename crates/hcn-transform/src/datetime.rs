//! Visit timestamp parsing and ISO 8601 formatting.
//!
//! The legacy export is not consistent about its timestamp layout, so a list
//! of known formats is tried in order. Date-only values are read as midnight.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

const DATETIME_FORMATS: [&str; 11] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d-%b-%Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%d-%b-%Y", "%m/%d/%Y", "%Y%m%d"];

/// Parses a raw `visit_datetime` value.
///
/// Returns `None` for blank or unrecognized input. A trailing `Z` is accepted
/// and ignored; values are treated as naive local timestamps.
pub fn parse_visit_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let trimmed = trimmed.strip_suffix('Z').unwrap_or(trimmed);

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

/// Calendar date of a raw `visit_datetime` value.
pub fn parse_visit_date(value: &str) -> Option<NaiveDate> {
    parse_visit_datetime(value).map(|dt| dt.date())
}

/// Formats a timestamp as `YYYY-MM-DDTHH:MM:SS`.
pub fn format_iso_datetime(value: NaiveDateTime) -> String {
    value.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Normalizes a raw `visit_datetime` value to ISO 8601, `None` if unparseable.
pub fn normalize_visit_datetime(value: &str) -> Option<String> {
    parse_visit_datetime(value).map(format_iso_datetime)
}
