//! Cache service trait and error types.

use async_trait::async_trait;

use crate::domain::availability::AvailabilityState;

/// Errors that can occur while setting up a cache backend.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Store for the last effective availability state of each domain.
///
/// Implementations must be thread-safe and fail-open: a broken backend is
/// logged and behaves like an empty cache, it never fails a search.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::PgStatusCache`] - PostgreSQL upsert store
/// - [`crate::infrastructure::cache::TieredCache`] - Redis over PostgreSQL
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Upserts the effective state for `domain`.
    ///
    /// # Errors
    ///
    /// Single-backend implementations log and return `Ok(())`. Composite
    /// implementations may return an error when one of their layers fails.
    async fn set_status(&self, domain: &str, state: AvailabilityState) -> CacheResult<()>;

    /// Returns the last cached state for `domain`.
    ///
    /// - `Ok(Some(state))` on cache hit
    /// - `Ok(None)` on cache miss or error (fail-open behavior)
    async fn get_status(&self, domain: &str) -> CacheResult<Option<AvailabilityState>>;

    /// Checks if the cache backend is healthy.
    ///
    /// Used by the health endpoint to report cache status.
    async fn health_check(&self) -> bool;
}
