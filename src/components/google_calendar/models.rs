use serde::Deserialize;

/// Normalized calendar event, immutable once constructed.
///
/// `start`/`end` keep the wire strings: a bare `YYYY-MM-DD` for all-day
/// events (end date exclusive) or a full ISO-8601 timestamp for timed
/// events (end inclusive). Day-level comparisons use the first ten
/// characters only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub summary: String,
    pub description: String,
    pub creator_email: String,
    pub organizer_display_name: String,
    pub start: String,
    pub end: String,
    pub is_all_day: bool,
}

/// Wire shape of the events endpoint response
#[derive(Debug, Deserialize)]
pub(crate) struct EventsResponse {
    #[serde(default)]
    pub items: Vec<EventItem>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct EventItem {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub creator: Person,
    #[serde(default)]
    pub organizer: Person,
    #[serde(default)]
    pub start: EventTime,
    #[serde(default)]
    pub end: EventTime,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Person {
    #[serde(default)]
    pub email: String,
    #[serde(rename = "displayName", default)]
    pub display_name: String,
}

/// Either `date` (all-day) or `dateTime` (timed) is present
#[derive(Debug, Default, Deserialize)]
pub(crate) struct EventTime {
    pub date: Option<String>,
    #[serde(rename = "dateTime")]
    pub date_time: Option<String>,
}

impl EventItem {
    /// Normalize a wire item. Items with no usable start/end pair are
    /// dropped rather than aborting the whole response.
    pub(crate) fn into_event(self) -> Option<CalendarEvent> {
        let (start, end, is_all_day) = match (self.start.date, self.end.date) {
            (Some(start), Some(end)) => (start, end, true),
            _ => {
                let start = self.start.date_time?;
                let end = self.end.date_time?;
                (start, end, false)
            }
        };

        Some(CalendarEvent {
            summary: self.summary,
            description: self.description,
            creator_email: self.creator.email,
            organizer_display_name: self.organizer.display_name,
            start,
            end,
            is_all_day,
        })
    }
}
