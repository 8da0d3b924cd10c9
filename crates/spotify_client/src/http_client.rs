//! HTTP client implementation for the Spotify Web API.
//!
//! This module provides a reqwest-based implementation of the [`SpotifyClient`](crate::SpotifyClient) trait.

use crate::config::Config;
use crate::{AccessToken, RecentlyPlayed, SpotifyClient, SpotifyError, TokenError};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

/// Timeout applied to every outbound call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the Spotify accounts and Web API endpoints using reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestSpotifyClient {
    accounts_url: String,
    api_url: String,
    client_id: String,
    client_secret: SecretString,
    refresh_token: SecretString,
    client: reqwest::Client,
}

impl ReqwestSpotifyClient {
    /// Create a client from configuration with the default request timeout.
    pub fn new(config: &Config) -> Result<Self, SpotifyError> {
        Self::with_timeout(config, REQUEST_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(config: &Config, timeout: Duration) -> Result<Self, SpotifyError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            accounts_url: config.accounts_url.trim_end_matches('/').to_string(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            refresh_token: config.refresh_token.clone(),
            client,
        })
    }

    /// `Basic` credential built from `client_id:client_secret`.
    fn basic_credentials(&self) -> String {
        let raw = format!("{}:{}", self.client_id, self.client_secret.expose_secret());
        format!("Basic {}", STANDARD.encode(raw))
    }

    /// Extract error information from a failed response.
    async fn error_from_response(&self, resp: reqwest::Response) -> SpotifyError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let body_snippet: String = body.chars().take(256).collect();
        SpotifyError::from_status(status, body_snippet)
    }
}

#[derive(serde::Deserialize)]
struct TokenPayload {
    access_token: Option<String>,
}

#[async_trait]
impl SpotifyClient for ReqwestSpotifyClient {
    async fn refresh_access_token(&self) -> Result<AccessToken, TokenError> {
        let url = format!("{}/api/token", self.accounts_url);
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", self.refresh_token.expose_secret()),
        ];
        let resp = self
            .client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, self.basic_credentials())
            .form(&form)
            .send()
            .await
            .map_err(|e| TokenError::Request(e.to_string()))?;

        let status = resp.status().as_u16();
        let text = resp
            .text()
            .await
            .map_err(|e| TokenError::Request(e.to_string()))?;

        if status != 200 {
            tracing::warn!(status, body = %text, "token refresh rejected");
            return Err(TokenError::Rejected { status, body: text });
        }

        let payload: TokenPayload =
            serde_json::from_str(&text).map_err(|e| TokenError::Malformed(e.to_string()))?;
        let token = payload
            .access_token
            .ok_or_else(|| TokenError::Malformed("missing access_token".into()))?;
        tracing::info!("access token generated");
        Ok(AccessToken::new(token))
    }

    async fn get_recently_played(
        &self,
        token: &AccessToken,
        limit: u32,
    ) -> Result<RecentlyPlayed, SpotifyError> {
        let url = format!("{}/v1/me/player/recently-played", self.api_url);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(token.secret())
            .query(&[("limit", limit.to_string())])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(self.error_from_response(resp).await);
        }
        // Read as text first so a non-JSON body yields a readable error.
        let text = resp.text().await?;
        let value: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
            let body_snippet: String = text.chars().take(256).collect();
            SpotifyError::Decode(format!("{e} - body: {body_snippet}"))
        })?;
        let batch = RecentlyPlayed::new(value);
        tracing::debug!(items = batch.item_count(), "recently played page fetched");
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            client_id: "id".into(),
            client_secret: SecretString::new("secret".into()),
            refresh_token: SecretString::new("refresh".into()),
            accounts_url: "http://localhost/".into(),
            api_url: "http://localhost".into(),
        }
    }

    #[test]
    fn basic_credentials_encode_id_and_secret() {
        let client = ReqwestSpotifyClient::new(&config()).expect("client");
        // base64("id:secret")
        assert_eq!(client.basic_credentials(), "Basic aWQ6c2VjcmV0");
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = ReqwestSpotifyClient::new(&config()).expect("client");
        assert_eq!(client.accounts_url, "http://localhost");
    }

    #[test]
    fn debug_does_not_leak_secrets() {
        let client = ReqwestSpotifyClient::new(&config()).expect("client");
        let dbg = format!("{client:?}");
        assert!(!dbg.contains("refresh\""));
        assert!(!dbg.contains("\"secret\""));
    }
}
