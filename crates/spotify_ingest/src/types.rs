use serde::{Deserialize, Serialize};

/// Details about a successful run, attached to the result.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunMetadata {
    pub date: String,
    pub tracks_count: usize,
    pub bucket: String,
}

/// Structured outcome of one invocation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct InvocationResult {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RunMetadata>,
}

impl InvocationResult {
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
            metadata: None,
        }
    }

    /// 500 result whose body is `{"error": "<message>"}`.
    pub fn from_error(err: &dyn std::error::Error) -> Self {
        let body = serde_json::json!({ "error": err.to_string() }).to_string();
        Self::new(500, body)
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: RunMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

/// Per-invocation context supplied by whatever triggers the job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvocationContext {
    pub invocation_id: String,
}

impl InvocationContext {
    pub fn new() -> Self {
        Self {
            invocation_id: uuid::Uuid::new_v4().to_string(),
        }
    }
}

impl Default for InvocationContext {
    fn default() -> Self {
        Self::new()
    }
}
