//! Audit events for asynchronous search history tracking.

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::warn;
use uuid::Uuid;

use crate::domain::availability::AvailabilityState;
use crate::domain::entities::NewHistoryEntry;

/// An audit write, passed from the search pipeline to the history worker.
///
/// # Usage Flow
///
/// 1. Created by the search service after resolving a candidate
/// 2. Sent to a bounded channel via [`HistorySink::send`] (non-blocking)
/// 3. Persisted by [`crate::domain::history_worker::run_history_worker`]
///
/// Events of one request travel through a single channel in pipeline order,
/// so an `UpdateState` is always processed after the `Record` it targets.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEvent {
    Record(NewHistoryEntry),
    UpdateState {
        request_id: Uuid,
        domain: String,
        query: String,
        state: AvailabilityState,
    },
}

impl HistoryEvent {
    /// Domain the event refers to.
    pub fn domain(&self) -> &str {
        match self {
            Self::Record(entry) => &entry.domain,
            Self::UpdateState { domain, .. } => domain,
        }
    }
}

/// Fire-and-forget sender side of the history channel.
///
/// A full or closed queue drops the event with a warning; the search itself
/// is never affected.
#[derive(Debug, Clone)]
pub struct HistorySink {
    tx: mpsc::Sender<HistoryEvent>,
}

impl HistorySink {
    pub fn new(tx: mpsc::Sender<HistoryEvent>) -> Self {
        Self { tx }
    }

    /// Queues an event without waiting.
    pub fn send(&self, event: HistoryEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                metrics::counter!("domain_search_history_dropped_total", "reason" => "full")
                    .increment(1);
                warn!(domain = %event.domain(), "History queue is full, dropping audit event");
            }
            Err(TrySendError::Closed(event)) => {
                metrics::counter!("domain_search_history_dropped_total", "reason" => "closed")
                    .increment(1);
                warn!(domain = %event.domain(), "History queue is closed, dropping audit event");
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Remaining free slots in the queue.
    pub fn capacity(&self) -> usize {
        self.tx.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(domain: &str) -> NewHistoryEntry {
        NewHistoryEntry {
            request_id: Uuid::new_v4(),
            domain: domain.to_string(),
            state: AvailabilityState::Taken,
            zone: ".com".to_string(),
            query: "example".to_string(),
            language: None,
            client_ip: None,
            user_agent: None,
        }
    }

    #[tokio::test]
    async fn test_sink_delivers_in_order() {
        let (tx, mut rx) = mpsc::channel(10);
        let sink = HistorySink::new(tx);
        let record = entry("example.com");
        let request_id = record.request_id;

        sink.send(HistoryEvent::Record(record.clone()));
        sink.send(HistoryEvent::UpdateState {
            request_id,
            domain: "example.com".to_string(),
            query: "example".to_string(),
            state: AvailabilityState::Available,
        });

        assert_eq!(rx.recv().await, Some(HistoryEvent::Record(record)));
        assert!(matches!(
            rx.recv().await,
            Some(HistoryEvent::UpdateState { state: AvailabilityState::Available, .. })
        ));
    }

    #[tokio::test]
    async fn test_sink_drops_when_full() {
        let (tx, mut rx) = mpsc::channel(1);
        let sink = HistorySink::new(tx);

        sink.send(HistoryEvent::Record(entry("a.com")));
        sink.send(HistoryEvent::Record(entry("b.com")));

        assert_eq!(rx.recv().await.map(|e| e.domain().to_string()), Some("a.com".to_string()));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_sink_drops_when_closed() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sink = HistorySink::new(tx);

        assert!(sink.is_closed());
        sink.send(HistoryEvent::Record(entry("a.com")));
    }
}
