//! Date parsing and Indian `DD/MM/YYYY` formatting.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::PLACEHOLDER;

/// Parse a date string as sent by the front end or stored on a record.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, RFC 3339 timestamps and naive
/// `YYYY-MM-DDTHH:MM:SS[.fff]`. A timestamp keeps the calendar date of
/// its own offset.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y/%m/%d") {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

/// Format a date string as `DD/MM/YYYY`, or the placeholder.
pub fn format_date(value: Option<&str>) -> String {
    format_naive_date(value.and_then(parse_date))
}

/// Format an already-parsed date as `DD/MM/YYYY`, or the placeholder.
pub fn format_naive_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format("%d/%m/%Y").to_string(),
        None => PLACEHOLDER.to_string(),
    }
}
