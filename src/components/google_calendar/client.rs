use super::models::{CalendarEvent, EventsResponse};
use super::time::MonthWindow;
use super::token::TokenManager;
use crate::components::state_store::{StateStore, ACCESS_TOKEN_KEY};
use crate::config::Config;
use crate::error::{google_calendar_error, token_refresh_error, CalResult};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, warn};
use url::Url;

/// Seam between the orchestrator and the fetch protocol
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Fetch the month's events across all configured calendars.
    ///
    /// Success means every calendar succeeded; any hard failure discards
    /// the accumulated events at the caller.
    async fn fetch_month(
        &self,
        store: &mut dyn StateStore,
        window: &MonthWindow,
    ) -> CalResult<Vec<CalendarEvent>>;
}

/// Google Calendar client implementing the credential & fetch protocol:
/// per calendar, one fetch with the current credential, at most one token
/// refresh followed by one retried fetch, hard failure aborts the rest.
pub struct GoogleCalendarClient {
    client: Client,
    events_base_url: String,
    token_manager: TokenManager,
    fallback_access_token: String,
    calendar_ids: Vec<String>,
}

impl GoogleCalendarClient {
    pub fn from_config(config: &Config) -> Self {
        let client = Client::new();

        let token_manager = TokenManager::new(
            client.clone(),
            config.token_url.clone(),
            config.google_client_id.clone(),
            config.google_client_secret.clone(),
            config.google_refresh_token.clone(),
        );

        Self {
            client,
            events_base_url: config.events_base_url.clone(),
            token_manager,
            fallback_access_token: config.google_access_token.clone(),
            calendar_ids: config.calendar_ids.clone(),
        }
    }

    /// Fetch one calendar's events for the month window
    async fn fetch_calendar(
        &self,
        access_token: &str,
        calendar_id: &str,
        window: &MonthWindow,
    ) -> CalResult<Vec<CalendarEvent>> {
        let mut url = Url::parse(&format!(
            "{}/{}/events",
            self.events_base_url, calendar_id
        ))
        .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))?;

        url.query_pairs_mut()
            .append_pair("timeMin", &window.time_min)
            .append_pair("timeMax", &window.time_max);

        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", access_token))
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to fetch events: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to fetch events: HTTP {} - {}",
                status, error_body
            )));
        }

        let response_data: EventsResponse = response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse events response: {}", e)))?;

        Ok(response_data
            .items
            .into_iter()
            .filter_map(|item| item.into_event())
            .collect())
    }
}

#[async_trait]
impl EventSource for GoogleCalendarClient {
    async fn fetch_month(
        &self,
        store: &mut dyn StateStore,
        window: &MonthWindow,
    ) -> CalResult<Vec<CalendarEvent>> {
        let mut access_token = store
            .get(ACCESS_TOKEN_KEY)
            .filter(|token| !token.is_empty())
            .unwrap_or_else(|| self.fallback_access_token.clone());

        let mut events = Vec::new();

        for calendar_id in &self.calendar_ids {
            info!("Fetching events for calendar {}", calendar_id);

            match self.fetch_calendar(&access_token, calendar_id, window).await {
                Ok(mut batch) => {
                    info!(
                        "Retrieved {} events for calendar {}",
                        batch.len(),
                        calendar_id
                    );
                    events.append(&mut batch);
                }
                Err(e) => {
                    warn!(
                        "Fetch failed for calendar {} ({}); refreshing access token",
                        calendar_id, e
                    );

                    // Exactly one refresh, then at most one retried fetch.
                    // A failure on either path aborts remaining calendars.
                    let new_token = self.token_manager.refresh_access_token().await?;
                    if new_token.is_empty() {
                        return Err(token_refresh_error(
                            "Token refresh returned an empty access token",
                        ));
                    }

                    store.set(ACCESS_TOKEN_KEY, &new_token)?;
                    access_token = new_token;

                    let mut batch = self
                        .fetch_calendar(&access_token, calendar_id, window)
                        .await?;
                    info!(
                        "Retrieved {} events for calendar {} after refresh",
                        batch.len(),
                        calendar_id
                    );
                    events.append(&mut batch);
                }
            }
        }

        Ok(events)
    }
}
