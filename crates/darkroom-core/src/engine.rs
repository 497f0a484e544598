//! Batch orchestration - the per-invocation control loop.
//!
//! One loop serves all three strategies: unwrap each envelope, extract each
//! item, run the strategy's guard, then download → transform → upload. Every
//! failure is caught at its own granularity (envelope, extraction, or item
//! processing) so nothing short of panic can abort a batch, and `process`
//! always comes back with a `BatchResult`.

use std::sync::Arc;

use crate::codec;
use crate::error::ProcessError;
use crate::event::{ItemEvent, NotificationBatch};
use crate::store::ObjectStore;
use crate::transform::{SourceImage, Transform, TransformOutput};
use crate::types::BatchResult;

/// Tracks all three per-item outcomes while a batch is in flight.
///
/// Skips never reach the `BatchResult`, but keeping them here preserves the
/// conservation property: processed + failed + skipped equals the total item
/// count across all parseable envelopes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Tally {
    pub processed: u64,
    pub failed: u64,
    pub skipped: u64,
}

impl Tally {
    fn into_result(self) -> BatchResult {
        BatchResult::new(self.processed, self.failed)
    }
}

/// The notification-batch processing engine, parameterized by a storage
/// collaborator and one transform strategy.
///
/// Holds no mutable state: a single processor may serve any number of
/// concurrent invocations.
pub struct BatchProcessor {
    store: Arc<dyn ObjectStore>,
    transform: Arc<dyn Transform>,
}

impl BatchProcessor {
    /// Create a processor. The store handle is expected to be the
    /// process-wide one, built once and reused across invocations.
    pub fn new(store: Arc<dyn ObjectStore>, transform: Arc<dyn Transform>) -> Self {
        Self { store, transform }
    }

    /// Process one notification batch to completion.
    ///
    /// Infallible by contract: errors surface only as counts in the returned
    /// `BatchResult` and as log lines attributed to the offending key.
    pub async fn process(&self, batch: &NotificationBatch) -> BatchResult {
        tracing::info!(
            transform = self.transform.name(),
            envelopes = batch.records.len(),
            "Processing notification batch"
        );

        let mut tally = Tally::default();

        for envelope in &batch.records {
            let group = match envelope.open() {
                Ok(group) => group,
                Err(e) => {
                    tracing::warn!("Failed to unwrap envelope: {}", e);
                    tally.failed += 1;
                    continue;
                }
            };

            for record in &group.records {
                let item = match ItemEvent::from_record(record) {
                    Ok(item) => item,
                    Err(e) => {
                        tracing::warn!("Failed to extract item event: {}", e);
                        tally.failed += 1;
                        continue;
                    }
                };

                // Loop prevention: the guard runs strictly before any download.
                if let Some(reason) = self.transform.guard(&item.bucket, &item.key) {
                    tracing::info!(key = %item.key, "Skipping ({})", reason);
                    tally.skipped += 1;
                    continue;
                }

                match self.process_item(&item).await {
                    Ok(()) => tally.processed += 1,
                    Err(e) => {
                        tracing::warn!(key = %item.key, "Failed to process: {}", e);
                        tally.failed += 1;
                    }
                }
            }
        }

        tracing::info!(
            processed = tally.processed,
            failed = tally.failed,
            skipped = tally.skipped,
            "Batch complete"
        );
        tally.into_result()
    }

    /// Run one item through download → decode → transform → upload.
    async fn process_item(&self, item: &ItemEvent) -> Result<(), ProcessError> {
        tracing::debug!(bucket = %item.bucket, key = %item.key, "Downloading");
        let bytes = self.store.get_object(&item.bucket, &item.key).await?;

        let image = codec::decode(&bytes, &item.key)?;
        let source = SourceImage {
            key: item.key.clone(),
            bytes,
            image,
        };

        let output = self.transform.apply(&source)?;
        let (body, content_type) = match output {
            TransformOutput::Image(image) => (codec::encode_jpeg(&image, &item.key)?, "image/jpeg"),
            TransformOutput::Raw {
                bytes,
                content_type,
            } => (bytes, content_type),
        };

        let dest = self.transform.destination(&item.bucket, &item.key);
        tracing::debug!(bucket = %dest.bucket, key = %dest.key, "Uploading");
        self.store
            .put_object(&dest.bucket, &dest.key, body, content_type)
            .await?;
        Ok(())
    }
}
