//! Redis-backed status cache.

use super::service::{CacheError, CacheResult, CacheService};
use crate::domain::availability::AvailabilityState;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, error, info, warn};

/// Redis status cache.
///
/// Uses `ConnectionManager` for connection reuse. Entries expire after the
/// configured TTL. All operations are fail-open.
pub struct RedisCache {
    client: ConnectionManager,
    ttl_seconds: u64,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING fails.
    pub async fn connect(redis_url: &str, ttl_seconds: u64) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self {
            client: manager,
            ttl_seconds,
            key_prefix: "status:".to_string(),
        })
    }

    fn build_key(&self, domain: &str) -> String {
        format!("{}{}", self.key_prefix, domain)
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn set_status(&self, domain: &str, state: AvailabilityState) -> CacheResult<()> {
        let key = self.build_key(domain);
        let mut conn = self.client.clone();

        match conn
            .set_ex::<_, _, ()>(&key, state.as_str(), self.ttl_seconds)
            .await
        {
            Ok(()) => debug!(%domain, %state, "Status cached"),
            Err(e) => warn!(%domain, error = %e, "Redis SET failed"),
        }
        Ok(())
    }

    async fn get_status(&self, domain: &str) -> CacheResult<Option<AvailabilityState>> {
        let key = self.build_key(domain);
        let mut conn = self.client.clone();

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(raw)) => match raw.parse::<AvailabilityState>() {
                Ok(state) => Ok(Some(state)),
                Err(_) => {
                    warn!(%domain, value = %raw, "Unrecognised cached status");
                    Ok(None)
                }
            },
            Ok(None) => {
                debug!(%domain, "Status cache MISS");
                Ok(None)
            }
            Err(e) => {
                error!(%domain, error = %e, "Redis GET failed");
                Ok(None)
            }
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
