use crate::error::{config_error, env_error, CalResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Default OAuth token endpoint
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Default Calendar API base URL (per-calendar events live under this)
pub const DEFAULT_EVENTS_BASE_URL: &str = "https://www.googleapis.com/calendar/v3/calendars";

/// Panel dimensions after portrait rotation
pub const DEFAULT_PANEL_WIDTH: i32 = 825;
pub const DEFAULT_PANEL_HEIGHT: i32 = 1200;

/// Main configuration structure for the appliance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Google Calendar API client ID
    pub google_client_id: String,
    /// Google Calendar API client secret
    pub google_client_secret: String,
    /// Long-lived refresh token used to mint access tokens
    pub google_refresh_token: String,
    /// Fallback access token used when the state store holds none
    pub google_access_token: String,
    /// Ordered list of calendar IDs to fetch
    pub calendar_ids: Vec<String>,
    /// IANA timezone name for the wall clock
    pub timezone: String,
    /// Path of the durable run-state file
    pub state_path: PathBuf,
    /// Seconds to wait for the network-connected signal
    pub network_timeout_secs: u64,
    /// Seconds to wait for the time-synchronized signal
    pub clock_sync_timeout_secs: u64,
    /// OAuth token endpoint
    pub token_url: String,
    /// Calendar API base URL
    pub events_base_url: String,
    /// Panel width in pixels
    pub panel_width: i32,
    /// Panel height in pixels
    pub panel_height: i32,
}

/// Shape of the optional `config/calendars.toml` file
#[derive(Debug, Deserialize)]
struct CalendarFile {
    #[serde(default)]
    calendars: Vec<String>,
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> CalResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Required environment variables
        let google_client_id =
            env::var("GOOGLE_CLIENT_ID").map_err(|_| env_error("GOOGLE_CLIENT_ID"))?;
        let google_client_secret =
            env::var("GOOGLE_CLIENT_SECRET").map_err(|_| env_error("GOOGLE_CLIENT_SECRET"))?;
        let google_refresh_token =
            env::var("GOOGLE_REFRESH_TOKEN").map_err(|_| env_error("GOOGLE_REFRESH_TOKEN"))?;

        // Optional fallback credential for the very first fetch
        let google_access_token = env::var("GOOGLE_ACCESS_TOKEN").unwrap_or_default();

        // Calendar IDs come from the environment, extended by an optional file
        let mut calendar_ids: Vec<String> = env::var("GOOGLE_CALENDAR_IDS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(String::from)
            .collect();

        if let Ok(content) = fs::read_to_string("config/calendars.toml") {
            if let Ok(file) = toml::from_str::<CalendarFile>(&content) {
                for id in file.calendars {
                    if !calendar_ids.contains(&id) {
                        calendar_ids.push(id);
                    }
                }
            }
        }

        if calendar_ids.is_empty() {
            return Err(config_error(
                "No calendar IDs configured (GOOGLE_CALENDAR_IDS or config/calendars.toml)",
            ));
        }

        // Default timezone
        let timezone = env::var("TIMEZONE").unwrap_or_else(|_| String::from("UTC"));

        let state_path = env::var("STATE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("kalenteri-state.toml"));

        let network_timeout_secs = env::var("NETWORK_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let clock_sync_timeout_secs = env::var("CLOCK_SYNC_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(20);

        Ok(Config {
            google_client_id,
            google_client_secret,
            google_refresh_token,
            google_access_token,
            calendar_ids,
            timezone,
            state_path,
            network_timeout_secs,
            clock_sync_timeout_secs,
            token_url: DEFAULT_TOKEN_URL.to_string(),
            events_base_url: DEFAULT_EVENTS_BASE_URL.to_string(),
            panel_width: DEFAULT_PANEL_WIDTH,
            panel_height: DEFAULT_PANEL_HEIGHT,
        })
    }

    /// Resolve the configured timezone name
    pub fn tz(&self) -> CalResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| config_error(&format!("Unknown timezone: {}", self.timezone)))
    }
}
