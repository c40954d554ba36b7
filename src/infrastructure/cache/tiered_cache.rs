//! Redis in front of the durable PostgreSQL status store.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::service::{CacheResult, CacheService};
use crate::domain::availability::AvailabilityState;

/// Writes go to the durable store first, then to the fast layer. Reads try the
/// fast layer and fall back to the durable store, refilling the fast layer on
/// a durable hit.
pub struct TieredCache {
    fast: Arc<dyn CacheService>,
    durable: Arc<dyn CacheService>,
}

impl TieredCache {
    pub fn new(fast: Arc<dyn CacheService>, durable: Arc<dyn CacheService>) -> Self {
        Self { fast, durable }
    }
}

#[async_trait]
impl CacheService for TieredCache {
    async fn set_status(&self, domain: &str, state: AvailabilityState) -> CacheResult<()> {
        self.durable.set_status(domain, state).await?;
        self.fast.set_status(domain, state).await
    }

    async fn get_status(&self, domain: &str) -> CacheResult<Option<AvailabilityState>> {
        if let Ok(Some(state)) = self.fast.get_status(domain).await {
            return Ok(Some(state));
        }

        let state = self.durable.get_status(domain).await?;
        if let Some(state) = state {
            debug!(%domain, "Refilling fast status cache from durable store");
            // Fail-open: a refill failure only costs the next read a fallback.
            let _ = self.fast.set_status(domain, state).await;
        }

        Ok(state)
    }

    async fn health_check(&self) -> bool {
        let (durable, fast) = tokio::join!(self.durable.health_check(), self.fast.health_check());
        durable && fast
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::cache::CacheError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapCache {
        entries: Mutex<HashMap<String, AvailabilityState>>,
        broken: bool,
    }

    impl MapCache {
        fn broken() -> Self {
            Self {
                broken: true,
                ..Self::default()
            }
        }

        fn peek(&self, domain: &str) -> Option<AvailabilityState> {
            self.entries.lock().unwrap().get(domain).copied()
        }
    }

    #[async_trait]
    impl CacheService for MapCache {
        async fn set_status(&self, domain: &str, state: AvailabilityState) -> CacheResult<()> {
            if self.broken {
                return Err(CacheError::OperationError("down".to_string()));
            }
            self.entries
                .lock()
                .unwrap()
                .insert(domain.to_string(), state);
            Ok(())
        }

        async fn get_status(&self, domain: &str) -> CacheResult<Option<AvailabilityState>> {
            if self.broken {
                return Err(CacheError::OperationError("down".to_string()));
            }
            Ok(self.peek(domain))
        }

        async fn health_check(&self) -> bool {
            !self.broken
        }
    }

    #[tokio::test]
    async fn test_write_reaches_both_layers() {
        let fast = Arc::new(MapCache::default());
        let durable = Arc::new(MapCache::default());
        let cache = TieredCache::new(fast.clone(), durable.clone());

        cache
            .set_status("a.com", AvailabilityState::Taken)
            .await
            .unwrap();

        assert_eq!(durable.peek("a.com"), Some(AvailabilityState::Taken));
        assert_eq!(fast.peek("a.com"), Some(AvailabilityState::Taken));
    }

    #[tokio::test]
    async fn test_miss_falls_back_to_durable_and_refills() {
        let fast = Arc::new(MapCache::default());
        let durable = Arc::new(MapCache::default());
        durable
            .set_status("a.com", AvailabilityState::Available)
            .await
            .unwrap();
        let cache = TieredCache::new(fast.clone(), durable);

        assert_eq!(
            cache.get_status("a.com").await.unwrap(),
            Some(AvailabilityState::Available)
        );
        assert_eq!(fast.peek("a.com"), Some(AvailabilityState::Available));
    }

    #[tokio::test]
    async fn test_broken_fast_layer_still_persists_durably() {
        let durable = Arc::new(MapCache::default());
        let cache = TieredCache::new(Arc::new(MapCache::broken()), durable.clone());

        assert!(
            cache
                .set_status("a.com", AvailabilityState::Taken)
                .await
                .is_err()
        );
        assert_eq!(durable.peek("a.com"), Some(AvailabilityState::Taken));
        assert_eq!(
            cache.get_status("a.com").await.unwrap(),
            Some(AvailabilityState::Taken)
        );
        assert!(!cache.health_check().await);
    }
}
