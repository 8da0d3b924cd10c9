//! Error types for the ingestion job.

use thiserror::Error;

use crate::storage::StorageError;

/// Failures that end an invocation after the token step.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to fetch recent tracks: {0}")]
    Fetch(#[source] spotify_client::SpotifyError),

    #[error("Failed to save to S3: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Client error: {0}")]
    Client(String),
}

impl From<spotify_client::SpotifyError> for IngestError {
    fn from(err: spotify_client::SpotifyError) -> Self {
        match err {
            spotify_client::SpotifyError::Config(msg) => IngestError::Config(msg),
            other => IngestError::Fetch(other),
        }
    }
}

/// Result type alias for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;
