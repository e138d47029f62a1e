//! Screen composition for the refresh cycle.
//!
//! All layout happens here against the [`Display`] directives; the grid
//! mapper owns day-number placement and the event model owns which events
//! land where.

use super::grid::{DayGrid, GridGeometry};
use super::{Display, FontTier, Rect, TextAlign};
use crate::components::events::format::format_event_range;
use crate::components::google_calendar::CalendarEvent;
use crate::utils::text::wrap_description;

const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Characters of the organizer name shown in a day slot
const SLOT_LABEL_LEN: usize = 4;

/// Vertical distance between day slots inside a cell
const SLOT_SPACING: i32 = 24;

/// Entries per summary column before switching to the right column
const SUMMARY_COLUMN_ROWS: usize = 3;

/// Composes the calendar screens on a panel
pub struct ScreenComposer<'a> {
    display: &'a mut dyn Display,
}

impl<'a> ScreenComposer<'a> {
    pub fn new(display: &'a mut dyn Display) -> Self {
        Self { display }
    }

    fn center_x(&self) -> i32 {
        self.display.width() / 2
    }

    fn center_y(&self) -> i32 {
        self.display.height() / 2
    }

    fn progress_bar_origin(&self) -> (i32, i32) {
        (self.center_x() - 200, self.center_y() + 100)
    }

    /// First-run splash with the loading caption
    pub fn draw_splash(&mut self) {
        self.display.draw_text(
            FontTier::Mid,
            TextAlign::Center,
            self.center_x(),
            self.center_y() + 60,
            "System Loading",
        );
        let (bar_x, bar_y) = self.progress_bar_origin();
        self.display.draw_progress_bar(bar_x, bar_y, 0);
        self.display.commit();
    }

    /// Advance the first-run progress bar, optionally adding a status line
    /// below it. `line_index` counts status lines already shown.
    pub fn draw_progress(&mut self, percent: u8, line_index: i32, line: Option<&str>) {
        let (bar_x, bar_y) = self.progress_bar_origin();
        self.display.draw_progress_bar(bar_x, bar_y, percent);

        if let Some(line) = line {
            self.display.draw_text(
                FontTier::Mid,
                TextAlign::Left,
                bar_x,
                bar_y + 50 + line_index * 30,
                line,
            );
        }
        self.display.commit();
    }

    /// Draw the month grid and return the day-coordinate mapping.
    /// The cell matching `today` gets an inverted date box.
    pub fn draw_calendar_base(&mut self, offset: u32, max_day: u32, title: &str, today: u32) -> DayGrid {
        let geometry = GridGeometry::for_panel(self.display.width(), self.display.height());

        self.display
            .draw_text(FontTier::Header, TextAlign::Left, 22, 60, title);

        for (i, label) in WEEKDAY_LABELS.iter().enumerate() {
            self.display.draw_text(
                FontTier::Mid,
                TextAlign::Center,
                geometry.origin_x + i as i32 * geometry.cell_width + geometry.cell_width / 2,
                geometry.origin_y - 12,
                label,
            );
        }

        let grid = DayGrid::layout(&geometry, offset, max_day);
        let date_box_width = geometry.cell_width * 2 / 5;
        let date_box_height = 40;

        for day in 1..=max_day.min(super::grid::MAX_GRID_DAYS) {
            let Some(anchor) = grid.coordinates_for_day(day) else {
                continue;
            };

            self.display.outline_rect(Rect {
                x: anchor.x,
                y: anchor.y,
                width: geometry.cell_width,
                height: geometry.cell_height,
            });

            let date_box = Rect {
                x: anchor.x + geometry.cell_width - date_box_width,
                y: anchor.y,
                width: date_box_width,
                height: date_box_height,
            };

            let date_x = anchor.x + geometry.cell_width - 6;
            let date_y = anchor.y + 26;
            let label = day.to_string();

            if day == today {
                self.display.fill_rect(date_box);
                self.display
                    .draw_text_inverted(FontTier::Mid, TextAlign::Right, date_x, date_y, &label);
            } else {
                self.display.outline_rect(date_box);
                self.display
                    .draw_text(FontTier::Mid, TextAlign::Right, date_x, date_y, &label);
            }
        }

        self.display.commit();
        grid
    }

    /// Place one day's events into their display slots
    pub fn draw_day_slots(&mut self, grid: &DayGrid, day: u32, slots: &[(usize, &CalendarEvent)]) {
        let Some(anchor) = grid.coordinates_for_day(day) else {
            return;
        };

        for (slot, event) in slots {
            let label: String = event
                .organizer_display_name
                .chars()
                .take(SLOT_LABEL_LEN)
                .collect();

            self.display.draw_text(
                FontTier::Mid,
                TextAlign::Left,
                anchor.x + 4,
                anchor.y + SLOT_SPACING * *slot as i32,
                &label,
            );
        }

        if !slots.is_empty() {
            self.display.commit();
        }
    }

    /// Header and divider bars of the bottom-third summary panel
    pub fn draw_summary_frame(&mut self) {
        let width = self.display.width();
        let height = self.display.height();
        let top = height - height / 3;

        self.display.draw_text(
            FontTier::Mid,
            TextAlign::Center,
            self.center_x(),
            top,
            "Upcoming Events",
        );
        self.display.fill_rect(Rect {
            x: 20,
            y: top + 10,
            width: width - 40,
            height: 2,
        });
        self.display.fill_rect(Rect {
            x: width / 2 - 1,
            y: top + 10,
            width: 2,
            height: height / 3 - 30,
        });
        self.display.commit();
    }

    /// Render the summary entries in two three-row columns
    pub fn draw_summary_entries(&mut self, events: &[&CalendarEvent]) {
        let width = self.display.width();
        let height = self.display.height();
        let top = height - height / 3 + 40;

        let mut x = 20;
        let mut y = top;

        for (i, event) in events.iter().enumerate() {
            let headline = format!("{} - {}", event.organizer_display_name, event.summary);
            self.display
                .draw_text(FontTier::Small, TextAlign::Left, x, y, &headline);
            y += 20;

            let range = format_event_range(&event.start, &event.end, event.is_all_day);
            self.display
                .draw_text(FontTier::Tiny, TextAlign::Left, x, y, &range);
            y += 18;

            if !event.description.is_empty() {
                for line in wrap_description(&event.description) {
                    self.display
                        .draw_text(FontTier::Tiny, TextAlign::Left, x, y, &line);
                    y += 16;
                }
            }

            y += 20;

            if i + 1 == SUMMARY_COLUMN_ROWS {
                x = width / 2 + 20;
                y = top;
            }
        }

        self.display.commit();
    }

    /// Fetch-failure notice shown before the retry or escalation
    pub fn draw_fetch_failure(&mut self) {
        let x = self.center_x() - 200;
        let y = self.center_y() + 240;

        self.display.draw_text(
            FontTier::Mid,
            TextAlign::Left,
            x,
            y,
            "[Fail] Fetching Calendar Events",
        );
        self.display.draw_text(
            FontTier::Mid,
            TextAlign::Left,
            x,
            y + 30,
            "Check the access token and refresh token",
        );
        self.display.commit();
    }

    /// Bottom-right refresh timestamp
    pub fn draw_footer(&mut self, timestamp: &str) {
        self.display.draw_text(
            FontTier::Tiny,
            TextAlign::Right,
            self.display.width() - 20,
            self.display.height() - 8,
            &format!("Updated: {}", timestamp),
        );
        self.display.commit();
    }
}
