use crate::error::{token_refresh_error, CalResult};
use reqwest::Client;
use serde_json::Value;
use tracing::info;

/// Mints fresh access tokens from the long-lived refresh token.
///
/// The protocol allows exactly one refresh per failed calendar fetch; the
/// caller persists whatever this returns.
#[derive(Clone)]
pub struct TokenManager {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    refresh_token: String,
}

impl TokenManager {
    pub fn new(
        client: Client,
        token_url: String,
        client_id: String,
        client_secret: String,
        refresh_token: String,
    ) -> Self {
        Self {
            client,
            token_url,
            client_id,
            client_secret,
            refresh_token,
        }
    }

    /// Exchange the refresh token for a new access token
    pub async fn refresh_access_token(&self) -> CalResult<String> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", self.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| token_refresh_error(&format!("Failed to refresh token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(token_refresh_error(&format!(
                "Failed to refresh token: HTTP {} - {}",
                status, error_body
            )));
        }

        let token: Value = response
            .json()
            .await
            .map_err(|e| token_refresh_error(&format!("Failed to parse token response: {}", e)))?;

        let access_token = token
            .get("access_token")
            .and_then(|t| t.as_str())
            .ok_or_else(|| {
                token_refresh_error("Token response missing 'access_token' field")
            })?;

        info!("Access token refreshed");
        Ok(access_token.to_string())
    }
}
