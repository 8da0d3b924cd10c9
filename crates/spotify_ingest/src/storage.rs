//! Object-store seam used by the partitioned writer.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

/// Errors returned by an [`ObjectStore`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store rejected the request (missing bucket, access denied, ...).
    #[error("storage service error: {0}")]
    Service(String),

    /// A network or connection error occurred talking to the store.
    #[error("storage connection error: {0}")]
    Connection(String),

    #[error("storage request timed out: {0}")]
    Timeout(String),

    #[error("invalid storage configuration: {0}")]
    Configuration(String),
}

/// Classify an SDK error string into the matching [`StorageError`].
pub fn classify_sdk_error(error_str: &str) -> StorageError {
    let lower = error_str.to_lowercase();
    if lower.contains("timeout") || lower.contains("timed out") {
        StorageError::Timeout(error_str.to_owned())
    } else if lower.contains("connection")
        || lower.contains("connect")
        || lower.contains("dns")
        || lower.contains("dispatch failure")
    {
        StorageError::Connection(error_str.to_owned())
    } else {
        StorageError::Service(error_str.to_owned())
    }
}

/// A single object write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PutObject {
    pub bucket: String,
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: String,
}

/// "Put object" capability shared by the S3 store and test doubles.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    async fn put_object(&self, object: PutObject) -> Result<(), StorageError>;
}

/// In-memory store keyed by `(bucket, key)`.
///
/// Only buckets registered with [`MemoryObjectStore::with_bucket`] accept
/// writes, mirroring a real store where the bucket must already exist.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    buckets: Mutex<HashMap<String, HashMap<String, StoredObject>>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_bucket(self, bucket: impl Into<String>) -> Self {
        self.lock().entry(bucket.into()).or_default();
        self
    }

    pub fn get(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.lock().get(bucket).and_then(|b| b.get(key)).cloned()
    }

    /// Keys stored in `bucket`, sorted.
    pub fn keys(&self, bucket: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .lock()
            .get(bucket)
            .map(|b| b.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, HashMap<String, StoredObject>>> {
        // A poisoned map is still structurally valid.
        self.buckets
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_object(&self, object: PutObject) -> Result<(), StorageError> {
        let mut buckets = self.lock();
        let bucket = buckets.get_mut(&object.bucket).ok_or_else(|| {
            StorageError::Service(format!(
                "NoSuchBucket: The specified bucket does not exist: {}",
                object.bucket
            ))
        })?;
        bucket.insert(
            object.key,
            StoredObject {
                body: object.body,
                content_type: object.content_type,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put(bucket: &str, key: &str, body: &str) -> PutObject {
        PutObject {
            bucket: bucket.into(),
            key: key.into(),
            body: body.as_bytes().to_vec(),
            content_type: "application/json".into(),
        }
    }

    #[tokio::test]
    async fn memory_store_round_trips_objects() {
        let store = MemoryObjectStore::new().with_bucket("raw");
        store.put_object(put("raw", "a/b.json", "{}")).await.expect("put");
        let obj = store.get("raw", "a/b.json").expect("stored");
        assert_eq!(obj.body, b"{}");
        assert_eq!(obj.content_type, "application/json");
    }

    #[tokio::test]
    async fn memory_store_rejects_unknown_bucket() {
        let store = MemoryObjectStore::new();
        let err = store.put_object(put("missing", "k", "{}")).await.unwrap_err();
        assert!(matches!(err, StorageError::Service(_)));
        assert!(store.keys("missing").is_empty());
    }

    #[tokio::test]
    async fn memory_store_overwrites_same_key() {
        let store = MemoryObjectStore::new().with_bucket("raw");
        store.put_object(put("raw", "k", "first")).await.expect("put");
        store.put_object(put("raw", "k", "second")).await.expect("put");
        assert_eq!(store.keys("raw"), vec!["k".to_string()]);
        assert_eq!(store.get("raw", "k").expect("stored").body, b"second");
    }

    #[test]
    fn classify_timeout() {
        assert!(matches!(
            classify_sdk_error("Request timed out after 30s"),
            StorageError::Timeout(_)
        ));
    }

    #[test]
    fn classify_timeout_keeps_sdk_message() {
        let err = classify_sdk_error(
            "service error: RequestTimeout: Your socket connection to the server was not read from or written to within the timeout period",
        );
        assert!(matches!(err, StorageError::Timeout(_)));
        assert!(err.to_string().contains("RequestTimeout"));
        assert!(err.to_string().contains("within the timeout period"));
    }

    #[test]
    fn classify_connection() {
        assert!(matches!(
            classify_sdk_error("dispatch failure: Connection refused"),
            StorageError::Connection(_)
        ));
    }

    #[test]
    fn classify_generic_service_error() {
        assert!(matches!(
            classify_sdk_error("NoSuchBucket: The specified bucket does not exist"),
            StorageError::Service(_)
        ));
    }
}
