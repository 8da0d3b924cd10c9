//! Minimal `SpotifyClient` trait and the reqwest-based implementation used by
//! the ingestion job.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod config;
pub mod http_client;

/// Page size requested from the recently-played endpoint.
pub const RECENTLY_PLAYED_LIMIT: u32 = 50;

#[derive(Debug, Error)]
pub enum SpotifyError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{status} response: {body}")]
    Status { status: u16, body: String },
    #[error("decoding response: {0}")]
    Decode(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl SpotifyError {
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        SpotifyError::Status {
            status,
            body: body.into(),
        }
    }
}

/// Failure to exchange the refresh token for an access token.
///
/// Every variant maps onto the `{statusCode, body}` shape the job reports:
/// upstream rejections keep their status and raw body, everything else is
/// reported as 500.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token endpoint returned {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("Request failed: {0}")]
    Request(String),
    #[error("invalid token response: {0}")]
    Malformed(String),
}

impl TokenError {
    pub fn status_code(&self) -> u16 {
        match self {
            TokenError::Rejected { status, .. } => *status,
            TokenError::Request(_) | TokenError::Malformed(_) => 500,
        }
    }

    pub fn body(&self) -> String {
        match self {
            TokenError::Rejected { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }
}

/// Short-lived bearer token. Never printed, never persisted.
#[derive(Clone)]
pub struct AccessToken(SecretString);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::new(token.into().into_boxed_str()))
    }

    pub fn secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// Raw payload of the recently-played endpoint.
///
/// The job stores it as-is; only `items` is looked at, to count play events.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct RecentlyPlayed(serde_json::Value);

impl RecentlyPlayed {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Number of entries in `items`; 0 when absent or not an array.
    pub fn item_count(&self) -> usize {
        self.0
            .get("items")
            .and_then(serde_json::Value::as_array)
            .map_or(0, Vec::len)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

#[async_trait]
pub trait SpotifyClient: Send + Sync + 'static {
    /// Exchange the configured refresh token for a bearer token.
    async fn refresh_access_token(&self) -> Result<AccessToken, TokenError>;

    /// Fetch one page of the user's recently played tracks.
    async fn get_recently_played(
        &self,
        token: &AccessToken,
        limit: u32,
    ) -> Result<RecentlyPlayed, SpotifyError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejected_token_keeps_upstream_status_and_body() {
        let err = TokenError::Rejected {
            status: 400,
            body: r#"{"error":"invalid_grant"}"#.into(),
        };
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.body(), r#"{"error":"invalid_grant"}"#);
    }

    #[test]
    fn transport_token_failure_reports_500() {
        let err = TokenError::Request("connection refused".into());
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.body(), "Request failed: connection refused");
    }

    #[test]
    fn malformed_token_response_reports_500() {
        let err = TokenError::Malformed("missing access_token".into());
        assert_eq!(err.status_code(), 500);
        assert!(err.body().contains("missing access_token"));
    }

    #[test]
    fn access_token_debug_is_redacted() {
        let token = AccessToken::new("BQD-very-secret");
        assert_eq!(token.secret(), "BQD-very-secret");
        assert!(!format!("{token:?}").contains("BQD"));
    }

    #[test]
    fn item_count_handles_missing_and_non_array_items() {
        let batch = RecentlyPlayed::new(json!({"items": [{}, {}, {}]}));
        assert_eq!(batch.item_count(), 3);
        assert_eq!(RecentlyPlayed::new(json!({})).item_count(), 0);
        assert_eq!(RecentlyPlayed::new(json!({"items": "x"})).item_count(), 0);
    }

    #[test]
    fn recently_played_serializes_transparently() {
        let payload = json!({"items": [], "limit": 50, "next": null});
        let batch: RecentlyPlayed = serde_json::from_value(payload.clone()).expect("deserialize");
        assert_eq!(serde_json::to_value(&batch).expect("serialize"), payload);
    }
}
