//! Locale-aware date rendering.
//!
//! The UI is Czech, so dates follow the cs-CZ convention: day first,
//! dot-separated, no leading zeros on the day and month.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};

/// Format a raw timestamp string for display.
///
/// Accepts RFC3339 timestamps and bare `YYYY-MM-DD` dates. Anything
/// missing or unparseable renders as an empty string rather than an
/// error; the caller is showing a table cell, not validating input.
pub fn format_date(value: Option<&str>, with_time: bool) -> String {
    let raw = match value {
        Some(raw) => raw.trim(),
        None => return String::new(),
    };
    if raw.is_empty() {
        return String::new();
    }

    let parsed: Option<NaiveDateTime> = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc).naive_utc())
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        });

    match parsed {
        Some(dt) => render(&dt, with_time),
        None => String::new(),
    }
}

/// Format an already-parsed timestamp the same way.
pub fn format_timestamp(value: &DateTime<Utc>, with_time: bool) -> String {
    render(&value.naive_utc(), with_time)
}

fn render(dt: &NaiveDateTime, with_time: bool) -> String {
    let date = format!("{}. {}. {}", dt.day(), dt.month(), dt.year());
    if with_time {
        format!("{} {}:{:02}", date, dt.hour(), dt.minute())
    } else {
        date
    }
}
