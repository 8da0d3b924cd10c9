//! Scheduled ingestion of Spotify "recently played" pages into a
//! date-partitioned S3 bucket.

use std::sync::Arc;

use spotify_client::http_client::ReqwestSpotifyClient;

pub mod config;
pub mod error;
pub mod handler;
pub mod partition;
pub mod s3;
pub mod storage;
pub mod types;
pub mod writer;

pub use config::IngestConfig;
pub use error::{IngestError, IngestResult};
pub use handler::IngestHandler;
pub use partition::{KeyLayout, PartitionKey};
pub use storage::{MemoryObjectStore, ObjectStore, PutObject, StorageError};
pub use types::{InvocationContext, InvocationResult, RunMetadata};
pub use writer::{PartitionedWriter, WriteReceipt};

/// Parse the optional trigger argument. The event is never interpreted, so
/// anything that is not JSON is logged and replaced with `{}`.
pub fn parse_trigger(raw: Option<&str>) -> serde_json::Value {
    match raw {
        Some(raw) => serde_json::from_str(raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "trigger payload is not JSON; using {{}}");
            serde_json::json!({})
        }),
        None => serde_json::json!({}),
    }
}

/// Wire the production handler: reqwest Spotify client and S3 store.
pub async fn build_handler(config: &IngestConfig) -> IngestResult<IngestHandler> {
    let client = ReqwestSpotifyClient::new(&config.spotify)
        .map_err(|e| IngestError::Client(e.to_string()))?;
    let store = s3::S3ObjectStore::new(&config.s3_settings()).await;
    let writer = PartitionedWriter::new(Arc::new(store), config.bucket.clone(), config.key_layout);
    Ok(IngestHandler::new(Arc::new(client), writer))
}
