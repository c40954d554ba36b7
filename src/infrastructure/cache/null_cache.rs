//! No-op cache implementation for testing or disabled caching.

use super::service::{CacheResult, CacheService};
use crate::domain::availability::AvailabilityState;
use async_trait::async_trait;
use tracing::debug;

/// A cache implementation that stores nothing.
///
/// Every write succeeds and every read is a miss.
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        debug!("Using NullCache (status caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn set_status(&self, _domain: &str, _state: AvailabilityState) -> CacheResult<()> {
        Ok(())
    }

    async fn get_status(&self, _domain: &str) -> CacheResult<Option<AvailabilityState>> {
        Ok(None)
    }

    async fn health_check(&self) -> bool {
        true
    }
}
