//! Month arithmetic for the fetch window and the grid layout.

use chrono::{Datelike, NaiveDate};

/// Current-month fetch window plus the date range the grid enumerates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthWindow {
    /// First instant of the month, `timeMin` query value
    pub time_min: String,
    /// Last instant of the month, `timeMax` query value
    pub time_max: String,
    /// First calendar day of the month, `YYYY-MM-DD`
    pub start_date: String,
    /// Last calendar day of the month, `YYYY-MM-DD`
    pub end_date: String,
}

/// Everything the calendar base screen needs to know about the month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGeometry {
    /// Weekday index of day 1 (0 = Sunday)
    pub offset: u32,
    /// Number of days in the month
    pub max_day: u32,
    /// Today's day-of-month
    pub today: u32,
    /// Today as `YYYY-MM-DD`, the summary cutoff
    pub today_date: String,
    /// Header title, e.g. "March 2025"
    pub title: String,
}

/// Number of days in the given month, leap-February included
pub fn last_day_of_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}

/// Weekday index of the month's first day, 0 = Sunday
pub fn first_weekday_offset(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.weekday().num_days_from_sunday())
        .unwrap_or(0)
}

/// Fetch window for the month containing `today`, in calendar-local time
pub fn month_window(today: NaiveDate) -> MonthWindow {
    let year = today.year();
    let month = today.month();
    let last = last_day_of_month(year, month);

    MonthWindow {
        time_min: format!("{:04}-{:02}-01T00:00:00Z", year, month),
        time_max: format!("{:04}-{:02}-{:02}T23:59:59Z", year, month, last),
        start_date: format!("{:04}-{:02}-01", year, month),
        end_date: format!("{:04}-{:02}-{:02}", year, month, last),
    }
}

/// Layout facts for the month containing `today`
pub fn month_geometry(today: NaiveDate) -> MonthGeometry {
    MonthGeometry {
        offset: first_weekday_offset(today.year(), today.month()),
        max_day: last_day_of_month(today.year(), today.month()),
        today: today.day(),
        today_date: today.format("%Y-%m-%d").to_string(),
        title: today.format("%B %Y").to_string(),
    }
}
