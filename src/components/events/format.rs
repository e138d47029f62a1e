//! Human-readable rendering of event start/end ranges.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};

/// Returned whenever either endpoint fails to parse; a single malformed
/// event must not abort the render of the others.
pub const INVALID_FORMAT: &str = "Invalid date format";

const DATE_FORMAT: &str = "%b %d, %Y";
const DATE_TIME_FORMAT: &str = "%b %d, %Y %I:%M %p";

/// Drop the colon from a trailing `±HH:MM` offset so `%z` can parse it,
/// e.g. `-08:00` becomes `-0800`.
fn strip_offset_colon(value: &str) -> String {
    let bytes = value.as_bytes();
    if bytes.len() >= 6
        && bytes[bytes.len() - 3] == b':'
        && matches!(bytes[bytes.len() - 6], b'+' | b'-')
    {
        let mut out = String::with_capacity(value.len() - 1);
        out.push_str(&value[..value.len() - 3]);
        out.push_str(&value[value.len() - 2..]);
        out
    } else {
        value.to_string()
    }
}

/// Parse either a bare date or a full timestamp into local components
fn parse_endpoint(value: &str) -> Option<NaiveDateTime> {
    if !value.contains('T') {
        return NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0));
    }

    let stripped = strip_offset_colon(value);

    if let Ok(dt) = DateTime::parse_from_str(&stripped, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.naive_local());
    }

    // No offset, or a bare trailing Z
    NaiveDateTime::parse_from_str(stripped.trim_end_matches('Z'), "%Y-%m-%dT%H:%M:%S").ok()
}

/// Render a start/end pair for the summary panel.
///
/// All-day ends are exclusive, so the end is pulled back one day before
/// display; a one-day event renders as a single date. Timed events always
/// show both endpoints with time-of-day.
pub fn format_event_range(start: &str, end: &str, is_all_day: bool) -> String {
    let Some(start_dt) = parse_endpoint(start) else {
        return INVALID_FORMAT.to_string();
    };
    let Some(mut end_dt) = parse_endpoint(end) else {
        return INVALID_FORMAT.to_string();
    };

    if is_all_day {
        end_dt = end_dt - Duration::days(1);

        if start_dt.date() == end_dt.date() {
            return start_dt.format(DATE_FORMAT).to_string();
        }

        format!(
            "{} to {}",
            start_dt.format(DATE_FORMAT),
            end_dt.format(DATE_FORMAT)
        )
    } else {
        format!(
            "{} to {}",
            start_dt.format(DATE_TIME_FORMAT),
            end_dt.format(DATE_TIME_FORMAT)
        )
    }
}
