use crate::error::IngestError;
use crate::partition::KeyLayout;
use crate::s3::S3Settings;

pub const DEFAULT_REGION: &str = "eu-north-1";

/// Everything one invocation needs, read once at start-up.
#[derive(Clone, Debug)]
pub struct IngestConfig {
    pub spotify: spotify_client::config::Config,
    pub bucket: String,
    pub region: String,
    pub endpoint_url: Option<String>,
    pub key_layout: KeyLayout,
}

impl IngestConfig {
    pub fn from_env() -> Result<Self, IngestError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    pub fn from_env_with<F>(mut get: F) -> Result<Self, IngestError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let spotify = spotify_client::config::Config::from_env_with(&mut get)?;
        let bucket = get("RAW_S3_BUCKET_NAME")
            .filter(|b| !b.trim().is_empty())
            .ok_or_else(|| IngestError::Config("RAW_S3_BUCKET_NAME missing".into()))?;
        let region = get("AWS_REGION")
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_REGION.into());
        let endpoint_url = get("S3_ENDPOINT_URL").filter(|u| !u.is_empty());
        let key_layout = match get("RAW_S3_KEY_LAYOUT") {
            Some(v) => v.parse()?,
            None => KeyLayout::default(),
        };
        Ok(Self {
            spotify,
            bucket,
            region,
            endpoint_url,
            key_layout,
        })
    }

    pub fn s3_settings(&self) -> S3Settings {
        let settings = S3Settings::new(self.region.clone());
        match &self.endpoint_url {
            Some(url) => settings.with_endpoint_url(url.clone()),
            None => settings,
        }
    }
}
