// Export components
pub mod display;
pub mod events;
pub mod google_calendar;
pub mod network;
pub mod power;
pub mod state_store;

// Re-export the normalized event model
pub use google_calendar::CalendarEvent;
