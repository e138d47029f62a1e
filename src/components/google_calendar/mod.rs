mod client;
pub mod models;
pub mod time;
pub mod token;

pub use client::{EventSource, GoogleCalendarClient};
pub use models::CalendarEvent;
