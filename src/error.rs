use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the appliance
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Network error: {0}")]
    #[diagnostic(code(kalenteri::network))]
    Network(String),

    #[error("Time sync error: {0}")]
    #[diagnostic(code(kalenteri::time_sync))]
    TimeSync(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(kalenteri::google_calendar))]
    GoogleCalendar(String),

    #[error("Token refresh error: {0}")]
    #[diagnostic(code(kalenteri::token_refresh))]
    TokenRefresh(String),

    #[error("State store error: {0}")]
    #[diagnostic(code(kalenteri::state_store))]
    StateStore(String),

    #[error("Display error: {0}")]
    #[diagnostic(code(kalenteri::display))]
    Display(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(kalenteri::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(kalenteri::config))]
    Config(String),

    #[error(transparent)]
    #[diagnostic(code(kalenteri::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(kalenteri::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(kalenteri::other))]
    Other(String),
}

// Implement From for TOML serialization errors
impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type CalResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create network errors
pub fn network_error(message: &str) -> Error {
    Error::Network(message.to_string())
}

/// Helper to create time sync errors
pub fn time_sync_error(message: &str) -> Error {
    Error::TimeSync(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}

/// Helper to create token refresh errors
pub fn token_refresh_error(message: &str) -> Error {
    Error::TokenRefresh(message.to_string())
}

/// Helper to create state store errors
pub fn state_store_error(message: &str) -> Error {
    Error::StateStore(message.to_string())
}

/// Helper to create other errors
#[allow(dead_code)]
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
