//! Event normalization: day membership, per-day buckets, ordering and the
//! summary view selection.

pub mod format;

use crate::components::google_calendar::CalendarEvent;
use chrono::NaiveDate;
use std::collections::HashSet;

/// Maximum entries in the summary view
pub const MAX_SUMMARY_EVENTS: usize = 6;

/// First ten characters of an ISO-8601 string, i.e. `YYYY-MM-DD`
pub fn date_prefix(value: &str) -> &str {
    value.get(..10).unwrap_or(value)
}

/// Whether the event's range covers the given calendar day.
///
/// All-day ranges are end-exclusive (the source's end date is the day
/// after the event); timed ranges are end-inclusive.
pub fn is_event_on_day(event: &CalendarEvent, day: &str) -> bool {
    let start = date_prefix(&event.start);
    let end = date_prefix(&event.end);

    if event.is_all_day {
        day >= start && day < end
    } else {
        day >= start && day <= end
    }
}

/// One calendar day with its member events in given order.
///
/// Slots are 1-based display positions; assignment order is list order,
/// not sorted order.
#[derive(Debug)]
pub struct DayBucket<'a> {
    pub day: u32,
    pub date: String,
    pub slots: Vec<(usize, &'a CalendarEvent)>,
}

/// Enumerate every day from `start_date` to `end_date` inclusive and
/// collect each day's member events.
pub fn day_buckets<'a>(
    events: &'a [CalendarEvent],
    start_date: &str,
    end_date: &str,
) -> Vec<DayBucket<'a>> {
    let Some(start) = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").ok() else {
        return Vec::new();
    };
    let Some(end) = NaiveDate::parse_from_str(end_date, "%Y-%m-%d").ok() else {
        return Vec::new();
    };

    let mut buckets = Vec::new();
    let mut current = start;

    while current <= end {
        let date = current.format("%Y-%m-%d").to_string();

        let slots = events
            .iter()
            .filter(|event| is_event_on_day(event, &date))
            .enumerate()
            .map(|(i, event)| (i + 1, event))
            .collect();

        buckets.push(DayBucket {
            day: chrono::Datelike::day(&current),
            date,
            slots,
        });

        let Some(next) = current.succ_opt() else { break };
        current = next;
    }

    buckets
}

/// Sort ascending by `start`, preserving input order for equal starts.
/// ISO-8601 strings compare lexicographically in chronological order.
pub fn sort_by_start(events: &mut [CalendarEvent]) {
    events.sort_by(|a, b| a.start.cmp(&b.start));
}

/// Select the summary view: events starting on or after `cutoff`,
/// deduplicated on `(start, end)` keeping the first occurrence, capped at
/// [`MAX_SUMMARY_EVENTS`].
pub fn summary_events<'a>(events: &'a [CalendarEvent], cutoff: &str) -> Vec<&'a CalendarEvent> {
    let mut seen = HashSet::new();
    let mut selected = Vec::new();

    for event in events {
        if selected.len() >= MAX_SUMMARY_EVENTS {
            break;
        }

        if event.start.as_str() < cutoff {
            continue;
        }

        if !seen.insert((event.start.clone(), event.end.clone())) {
            continue;
        }

        selected.push(event);
    }

    selected
}
