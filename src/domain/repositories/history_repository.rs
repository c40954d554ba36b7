//! Repository trait for the search audit history.

use crate::domain::availability::AvailabilityState;
use crate::domain::entities::{HistoryEntry, NewHistoryEntry};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for search audit rows.
///
/// Writes are best-effort from the pipeline's point of view; they are issued
/// by the background history worker, never on the request path.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgHistoryRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Inserts a new audit row.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn record(&self, entry: NewHistoryEntry) -> Result<(), AppError>;

    /// Updates the state of the most recent row for `domain` and `query`
    /// written by the request `request_id`.
    ///
    /// Never inserts. Returns the number of updated rows (0 or 1).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn update_latest_state(
        &self,
        request_id: Uuid,
        domain: &str,
        query: &str,
        state: AvailabilityState,
    ) -> Result<u64, AppError>;

    /// Lists the most recent audit rows, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn recent(&self, limit: i64) -> Result<Vec<HistoryEntry>, AppError>;
}
