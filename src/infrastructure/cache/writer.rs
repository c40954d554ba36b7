//! Ordered, non-blocking status cache writes.

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::service::CacheService;
use crate::domain::availability::AvailabilityState;

/// One queued upsert of a domain's effective state.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub domain: String,
    pub state: AvailabilityState,
}

/// Sender side of the status write queue.
///
/// A single consumer applies writes in the order they were queued, so a
/// refresh after the retry pass always lands after the initial write for the
/// same domain. A full or closed queue drops the write with a warning.
#[derive(Debug, Clone)]
pub struct StatusWriter {
    tx: mpsc::Sender<StatusUpdate>,
}

impl StatusWriter {
    pub fn new(tx: mpsc::Sender<StatusUpdate>) -> Self {
        Self { tx }
    }

    /// Queues a write without waiting.
    pub fn send(&self, domain: &str, state: AvailabilityState) {
        let update = StatusUpdate {
            domain: domain.to_string(),
            state,
        };

        match self.tx.try_send(update) {
            Ok(()) => {}
            Err(TrySendError::Full(update)) => {
                metrics::counter!("domain_search_cache_writes_dropped_total", "reason" => "full")
                    .increment(1);
                warn!(domain = %update.domain, "Status queue is full, dropping cache write");
            }
            Err(TrySendError::Closed(update)) => {
                metrics::counter!("domain_search_cache_writes_dropped_total", "reason" => "closed")
                    .increment(1);
                warn!(domain = %update.domain, "Status queue is closed, dropping cache write");
            }
        }
    }
}

/// Applies queued writes one at a time until the channel closes.
///
/// Failed writes are logged and skipped.
pub async fn run_status_writer(
    mut rx: mpsc::Receiver<StatusUpdate>,
    cache: Arc<dyn CacheService>,
) {
    while let Some(update) = rx.recv().await {
        if let Err(e) = cache.set_status(&update.domain, update.state).await {
            warn!(domain = %update.domain, error = %e, "Failed to cache domain status");
        }
    }

    debug!("Status channel closed, writer stopping");
}

/// Creates the status queue and spawns its writer.
pub fn spawn_status_writer(
    cache: Arc<dyn CacheService>,
    capacity: usize,
) -> (StatusWriter, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let handle = tokio::spawn(run_status_writer(rx, cache));

    (StatusWriter::new(tx), handle)
}
