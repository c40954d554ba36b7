//! Background persistence of search audit events.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, warn};

use crate::domain::history_event::HistoryEvent;
use crate::domain::repositories::HistoryRepository;
use crate::error::AppError;

const MAX_ATTEMPTS: usize = 3;

/// Consumes audit events until the channel closes.
///
/// Events are processed one at a time in arrival order. Each write is retried
/// with a short jittered exponential backoff; a write that still fails is
/// logged and dropped.
pub async fn run_history_worker(
    mut rx: mpsc::Receiver<HistoryEvent>,
    repository: Arc<dyn HistoryRepository>,
) {
    while let Some(event) = rx.recv().await {
        let strategy = ExponentialBackoff::from_millis(2)
            .factor(25)
            .max_delay(Duration::from_secs(1))
            .map(jitter)
            .take(MAX_ATTEMPTS - 1);

        let result = Retry::start(strategy, || persist(repository.as_ref(), &event)).await;

        if let Err(e) = result {
            warn!(domain = %event.domain(), error = %e, "Failed to persist audit event");
        }
    }

    debug!("History channel closed, worker stopping");
}

async fn persist(repository: &dyn HistoryRepository, event: &HistoryEvent) -> Result<(), AppError> {
    match event {
        HistoryEvent::Record(entry) => repository.record(entry.clone()).await,
        HistoryEvent::UpdateState {
            request_id,
            domain,
            query,
            state,
        } => {
            let updated = repository
                .update_latest_state(*request_id, domain, query, *state)
                .await?;
            if updated == 0 {
                debug!(%domain, "No audit row to update");
            }
            Ok(())
        }
    }
}
