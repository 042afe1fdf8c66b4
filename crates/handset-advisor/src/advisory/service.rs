use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{info, warn};

use super::gateway::AdvisoryGateway;
use super::prompt::AdvisoryRequest;
use super::store::{AdvisoryId, AdvisoryOutcome, AdvisoryRecord, AdvisoryStore, AdvisoryStoreError};
use crate::config::AdvisoryConfig;

/// Shown when the generator cannot be reached or rejects the request.
pub const UNAVAILABLE_FALLBACK: &str = "AI 服務暫時不可用。";
/// Shown when the generator answers without any text.
pub const EMPTY_RESPONSE_FALLBACK: &str = "無法取得 AI 分析建議。";

static ADVISORY_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_advisory_id() -> AdvisoryId {
    let id = ADVISORY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AdvisoryId(format!("adv-{id:06}"))
}

/// Service pairing the text-generation gateway with the advisory store.
pub struct AdvisoryService<G, S> {
    gateway: Arc<G>,
    store: Arc<S>,
    in_flight: Arc<Semaphore>,
}

impl<G, S> AdvisoryService<G, S>
where
    G: AdvisoryGateway + 'static,
    S: AdvisoryStore + 'static,
{
    pub fn new(gateway: Arc<G>, store: Arc<S>) -> Self {
        Self::with_max_in_flight(gateway, store, AdvisoryConfig::DEFAULT_MAX_IN_FLIGHT)
    }

    /// At most `max_in_flight` submitted advisories resolve concurrently;
    /// further submissions are refused until one finishes.
    pub fn with_max_in_flight(gateway: Arc<G>, store: Arc<S>, max_in_flight: usize) -> Self {
        Self {
            gateway,
            store,
            in_flight: Arc::new(Semaphore::new(max_in_flight.max(1))),
        }
    }

    /// Request an advisory and wait for it. Never fails: generator errors
    /// become [`AdvisoryOutcome::Failed`] with a fallback message.
    pub async fn advise(&self, request: &AdvisoryRequest) -> AdvisoryOutcome {
        match self.gateway.generate(&request.prompt()).await {
            Ok(text) if !text.trim().is_empty() => AdvisoryOutcome::Succeeded(text),
            Ok(_) => {
                warn!(
                    device = %request.device_description,
                    "advisory generator returned no text"
                );
                AdvisoryOutcome::Failed(EMPTY_RESPONSE_FALLBACK.to_string())
            }
            Err(err) => {
                warn!(
                    device = %request.device_description,
                    error = %err,
                    "advisory generator unavailable"
                );
                AdvisoryOutcome::Failed(UNAVAILABLE_FALLBACK.to_string())
            }
        }
    }

    /// Store a pending advisory and resolve it in the background.
    /// Fails with [`AdvisoryServiceError::Busy`] while the in-flight limit is
    /// reached. Must be called from within a tokio runtime.
    pub fn submit(
        self: &Arc<Self>,
        request: AdvisoryRequest,
    ) -> Result<AdvisoryRecord, AdvisoryServiceError> {
        let permit = Arc::clone(&self.in_flight)
            .try_acquire_owned()
            .map_err(|_| AdvisoryServiceError::Busy)?;

        let record = AdvisoryRecord::pending(next_advisory_id(), &request);
        let stored = self.store.insert(record)?;

        let service = Arc::clone(self);
        let advisory_id = stored.id.clone();
        tokio::spawn(async move {
            service.resolve(advisory_id, request).await;
            drop(permit);
        });

        Ok(stored)
    }

    /// Fetch an advisory record for API responses.
    pub fn get(&self, advisory_id: &AdvisoryId) -> Result<AdvisoryRecord, AdvisoryServiceError> {
        let record = self
            .store
            .fetch(advisory_id)?
            .ok_or(AdvisoryStoreError::NotFound)?;
        Ok(record)
    }

    async fn resolve(&self, advisory_id: AdvisoryId, request: AdvisoryRequest) {
        let outcome = self.advise(&request).await;

        let mut record = match self.store.fetch(&advisory_id) {
            Ok(Some(record)) => record,
            Ok(None) => {
                warn!(advisory_id = %advisory_id.0, "advisory vanished before completion");
                return;
            }
            Err(err) => {
                warn!(advisory_id = %advisory_id.0, error = %err, "advisory lookup failed");
                return;
            }
        };

        record.complete(outcome);
        let status = record.outcome.label();
        match self.store.update(record) {
            Ok(()) => info!(advisory_id = %advisory_id.0, status, "advisory resolved"),
            Err(err) => {
                warn!(advisory_id = %advisory_id.0, error = %err, "advisory update failed")
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AdvisoryServiceError {
    #[error("too many advisories in flight")]
    Busy,
    #[error(transparent)]
    Store(#[from] AdvisoryStoreError),
}
