//! Date parsing and UTC day arithmetic used by the same-day booking guard.
//!
//! All boundaries are computed in UTC. The server's local timezone never
//! takes part in deciding which calendar day an appointment belongs to.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Years outside this range are rejected as invalid dates.
const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

/// Parses a caller-supplied appointment date.
///
/// Accepts RFC 3339 and RFC 2822 timestamps (any offset, normalized to UTC),
/// naive ISO or `MM/DD/YYYY` date-times which are read as UTC, and bare
/// `YYYY-MM-DD` or `MM/DD/YYYY` dates which resolve to midnight UTC. Returns
/// `None` for anything else, including years outside `1..=9999`.
pub fn parse_appointment_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    parse_any(input).filter(|ts| (MIN_YEAR..=MAX_YEAR).contains(&ts.year()))
}

fn parse_any(input: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Some(ts.with_timezone(&Utc));
    }

    if let Ok(ts) = DateTime::parse_from_rfc2822(input) {
        return Some(ts.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    DATE_FORMATS.iter().find_map(|format| {
        NaiveDate::parse_from_str(input, format)
            .ok()
            .map(|date| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
    })
}

/// The UTC calendar day a timestamp falls on.
pub fn utc_day(ts: DateTime<Utc>) -> NaiveDate {
    ts.date_naive()
}

/// Closed interval `[00:00:00.000, 23:59:59.999]` of the UTC day containing `ts`.
///
/// On the last representable day the end saturates at `DateTime::<Utc>::MAX_UTC`.
pub fn day_bounds(ts: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Utc.from_utc_datetime(&utc_day(ts).and_time(NaiveTime::MIN));
    let end = start
        .checked_add_signed(Duration::days(1))
        .and_then(|next| next.checked_sub_signed(Duration::milliseconds(1)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    (start, end)
}
