//! One ingestion run: token → recently played → partitioned write.

use std::sync::Arc;

use spotify_client::{RECENTLY_PLAYED_LIMIT, SpotifyClient};
use tracing::{debug, error, info, warn};

use crate::error::IngestResult;
use crate::partition::PartitionKey;
use crate::types::{InvocationContext, InvocationResult, RunMetadata};
use crate::writer::{PartitionedWriter, WriteReceipt};

const RUNS_TOTAL: &str = "spotify_ingest_runs_total";
const TRACKS_LAST_RUN: &str = "spotify_ingest_tracks_last_run";

#[derive(Clone)]
pub struct IngestHandler {
    client: Arc<dyn SpotifyClient>,
    writer: PartitionedWriter,
}

impl IngestHandler {
    pub fn new(client: Arc<dyn SpotifyClient>, writer: PartitionedWriter) -> Self {
        Self { client, writer }
    }

    /// Entry point for a scheduled trigger. The event payload is not
    /// interpreted; the partition is today's UTC date.
    pub async fn handle(
        &self,
        event: &serde_json::Value,
        ctx: &InvocationContext,
    ) -> InvocationResult {
        info!(invocation_id = %ctx.invocation_id, "ingestion run started");
        debug!(%event, "trigger payload");
        self.run_for(PartitionKey::today()).await
    }

    /// Run the pipeline for an explicit partition.
    pub async fn run_for(&self, partition: PartitionKey) -> InvocationResult {
        let token = match self.client.refresh_access_token().await {
            Ok(token) => token,
            Err(e) => {
                warn!(status = e.status_code(), error = %e, "token refresh failed; skipping fetch");
                metrics::counter!(RUNS_TOTAL, "outcome" => "token_rejected").increment(1);
                return InvocationResult::new(e.status_code(), e.body());
            }
        };

        match self.fetch_and_store(&token, &partition).await {
            Ok((receipt, tracks_count)) => {
                info!(
                    location = %receipt.location,
                    tracks_count,
                    date = %partition,
                    "ingestion run finished"
                );
                metrics::counter!(RUNS_TOTAL, "outcome" => "success").increment(1);
                metrics::gauge!(TRACKS_LAST_RUN).set(tracks_count as f64);
                InvocationResult::new(200, format!("Data saved to {}", receipt.location))
                    .with_metadata(RunMetadata {
                        date: partition.to_string(),
                        tracks_count,
                        bucket: receipt.bucket,
                    })
            }
            Err(e) => {
                error!(error = %e, date = %partition, "ingestion run failed");
                metrics::counter!(RUNS_TOTAL, "outcome" => "failed").increment(1);
                InvocationResult::from_error(&e)
            }
        }
    }

    async fn fetch_and_store(
        &self,
        token: &spotify_client::AccessToken,
        partition: &PartitionKey,
    ) -> IngestResult<(WriteReceipt, usize)> {
        let batch = self
            .client
            .get_recently_played(token, RECENTLY_PLAYED_LIMIT)
            .await?;
        let tracks_count = batch.item_count();
        let receipt = self.writer.write(&batch, partition).await?;
        Ok((receipt, tracks_count))
    }
}
