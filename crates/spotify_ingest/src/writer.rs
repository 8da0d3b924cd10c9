//! Writes a fetched payload to its daily partition.

use serde::Serialize;
use std::sync::Arc;

use crate::error::IngestResult;
use crate::partition::{KeyLayout, PartitionKey};
use crate::storage::{ObjectStore, PutObject, StorageError};

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Where a payload ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteReceipt {
    pub bucket: String,
    pub key: String,
    pub location: String,
}

#[derive(Clone)]
pub struct PartitionedWriter {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    layout: KeyLayout,
}

impl PartitionedWriter {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: impl Into<String>, layout: KeyLayout) -> Self {
        Self {
            store,
            bucket: bucket.into(),
            layout,
        }
    }

    /// Serialize `payload` as pretty JSON and store it under the partition's key.
    pub async fn write<T: Serialize + ?Sized>(
        &self,
        payload: &T,
        partition: &PartitionKey,
    ) -> IngestResult<WriteReceipt> {
        if self.bucket.trim().is_empty() {
            return Err(StorageError::Configuration("bucket name is empty".into()).into());
        }

        let body = serde_json::to_string_pretty(payload)?;
        let key = self.layout.object_key(partition);
        tracing::debug!(bucket = %self.bucket, key = %key, bytes = body.len(), "writing partition");

        self.store
            .put_object(PutObject {
                bucket: self.bucket.clone(),
                key: key.clone(),
                body: body.into_bytes(),
                content_type: JSON_CONTENT_TYPE.to_string(),
            })
            .await?;

        Ok(WriteReceipt {
            location: format!("s3://{}/{}", self.bucket, key),
            bucket: self.bucket.clone(),
            key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IngestError;
    use crate::storage::MemoryObjectStore;
    use chrono::NaiveDate;
    use serde_json::json;

    fn jan15() -> PartitionKey {
        PartitionKey::new(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
    }

    #[tokio::test]
    async fn write_stores_pretty_json_under_dated_key() {
        let store = Arc::new(MemoryObjectStore::new().with_bucket("raw-bucket"));
        let writer = PartitionedWriter::new(store.clone(), "raw-bucket", KeyLayout::Dated);
        let payload = json!({"items": [{"track": {"name": "Shape of You"}}]});

        let receipt = writer.write(&payload, &jan15()).await.expect("write");
        assert_eq!(receipt.key, "2024-01-15/2024-01-15_recent_tracks.json");
        assert_eq!(
            receipt.location,
            "s3://raw-bucket/2024-01-15/2024-01-15_recent_tracks.json"
        );

        let stored = store.get("raw-bucket", &receipt.key).expect("stored");
        assert_eq!(stored.content_type, "application/json");
        assert_eq!(
            stored.body,
            serde_json::to_string_pretty(&payload).unwrap().into_bytes()
        );
        let back: serde_json::Value = serde_json::from_slice(&stored.body).unwrap();
        assert_eq!(back["items"][0]["track"]["name"], "Shape of You");
    }

    #[tokio::test]
    async fn write_keeps_non_ascii_as_utf8() {
        let store = Arc::new(MemoryObjectStore::new().with_bucket("raw"));
        let writer = PartitionedWriter::new(store.clone(), "raw", KeyLayout::Dated);
        let payload = json!({"items": [{"track": {"album": {"name": "÷ (Deluxe)"}}}]});

        let receipt = writer.write(&payload, &jan15()).await.expect("write");
        let body = String::from_utf8(store.get("raw", &receipt.key).expect("stored").body)
            .expect("utf-8");
        assert!(body.contains("\"÷ (Deluxe)\""));
        assert!(!body.contains("\\u00f7"));
    }

    #[tokio::test]
    async fn write_with_empty_bucket_fails_before_storing() {
        let store = Arc::new(MemoryObjectStore::new().with_bucket(""));
        let writer = PartitionedWriter::new(store.clone(), "", KeyLayout::Dated);
        let err = writer.write(&json!({"foo": "bar"}), &jan15()).await.unwrap_err();
        assert!(matches!(
            err,
            IngestError::Storage(StorageError::Configuration(_))
        ));
        assert!(store.keys("").is_empty());
    }

    #[tokio::test]
    async fn write_to_missing_bucket_surfaces_storage_error() {
        let store = Arc::new(MemoryObjectStore::new());
        let writer = PartitionedWriter::new(store, "nope", KeyLayout::Dated);
        let err = writer.write(&json!({}), &jan15()).await.unwrap_err();
        assert!(err.to_string().starts_with("Failed to save to S3:"));
    }

    #[tokio::test]
    async fn date_only_layout_writes_fixed_name() {
        let store = Arc::new(MemoryObjectStore::new().with_bucket("raw"));
        let writer = PartitionedWriter::new(store.clone(), "raw", KeyLayout::DateOnly);
        let receipt = writer.write(&json!({"items": []}), &jan15()).await.expect("write");
        assert_eq!(receipt.key, "2024-01-15/recent_tracks.json");
        assert_eq!(store.keys("raw"), vec!["2024-01-15/recent_tracks.json".to_string()]);
    }
}
