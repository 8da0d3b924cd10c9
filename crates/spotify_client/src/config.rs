use crate::SpotifyError;
use secrecy::SecretString;

pub const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com";

#[derive(Clone, Debug)]
pub struct Config {
    pub client_id: String,
    pub client_secret: SecretString,
    pub refresh_token: SecretString,
    pub accounts_url: String,
    pub api_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, SpotifyError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function, so tests never touch the process environment.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, SpotifyError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut required = |key: &str| {
            get(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| SpotifyError::Config(format!("{key} missing")))
        };
        let client_id = required("SPOTIFY_CLIENT_ID")?;
        let client_secret = required("SPOTIFY_CLIENT_SECRET")?;
        let refresh_token = required("SPOTIFY_REFRESH_TOKEN")?;
        let accounts_url = get("SPOTIFY_ACCOUNTS_URL").unwrap_or_else(|| DEFAULT_ACCOUNTS_URL.into());
        let api_url = get("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into());
        Ok(Self {
            client_id,
            client_secret: SecretString::new(client_secret.into()),
            refresh_token: SecretString::new(refresh_token.into()),
            accounts_url,
            api_url,
        })
    }
}
