//! S3-backed [`ObjectStore`].

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use tracing::{debug, error, info};

use crate::storage::{ObjectStore, PutObject, StorageError, classify_sdk_error};

/// Connection settings for the S3 store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct S3Settings {
    /// AWS region (e.g. `"eu-north-1"`).
    pub region: String,
    /// Endpoint override for local development (LocalStack, MinIO).
    pub endpoint_url: Option<String>,
}

impl S3Settings {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            endpoint_url: None,
        }
    }

    #[must_use]
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }
}

pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
}

impl std::fmt::Debug for S3ObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3ObjectStore")
            .field("client", &"<S3Client>")
            .finish()
    }
}

impl S3ObjectStore {
    /// Build a store from the standard AWS credential chain.
    ///
    /// An endpoint override switches to path-style addressing, which local
    /// S3 emulators expect.
    pub async fn new(settings: &S3Settings) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(settings.region.clone()));
        if let Some(endpoint) = &settings.endpoint_url {
            debug!(endpoint = %endpoint, "using custom S3 endpoint");
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if settings.endpoint_url.is_some() {
            builder = builder.force_path_style(true);
        }
        Self {
            client: aws_sdk_s3::Client::from_conf(builder.build()),
        }
    }

    /// Create a store with a pre-built client.
    pub fn with_client(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, object: PutObject) -> Result<(), StorageError> {
        debug!(
            bucket = %object.bucket,
            key = %object.key,
            size = object.body.len(),
            "uploading object to S3"
        );

        self.client
            .put_object()
            .bucket(&object.bucket)
            .key(&object.key)
            .content_type(&object.content_type)
            .body(ByteStream::from(object.body))
            .send()
            .await
            .map_err(|e| {
                let err_str = DisplayErrorContext(&e).to_string();
                error!(error = %err_str, "S3 put_object failed");
                classify_sdk_error(&err_str)
            })?;

        info!(bucket = %object.bucket, key = %object.key, "S3 object uploaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_builder_sets_endpoint() {
        let settings = S3Settings::new("eu-north-1").with_endpoint_url("http://localhost:4566");
        assert_eq!(settings.region, "eu-north-1");
        assert_eq!(settings.endpoint_url.as_deref(), Some("http://localhost:4566"));
    }

    #[test]
    fn settings_default_has_no_endpoint() {
        assert!(S3Settings::new("us-east-1").endpoint_url.is_none());
    }
}
