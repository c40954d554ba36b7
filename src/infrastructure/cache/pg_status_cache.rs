//! PostgreSQL-backed status cache.

use super::service::{CacheResult, CacheService};
use crate::domain::availability::AvailabilityState;
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, warn};

/// Durable status store: one row per domain in `domain_status`, upserted.
pub struct PgStatusCache {
    pool: Arc<PgPool>,
}

impl PgStatusCache {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CacheService for PgStatusCache {
    async fn set_status(&self, domain: &str, state: AvailabilityState) -> CacheResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO domain_status (domain, state, checked_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (domain)
            DO UPDATE SET state = EXCLUDED.state, checked_at = EXCLUDED.checked_at
            "#,
        )
        .bind(domain)
        .bind(state.as_str())
        .execute(self.pool.as_ref())
        .await;

        match result {
            Ok(_) => debug!(%domain, %state, "Status stored"),
            Err(e) => warn!(%domain, error = %e, "Failed to store domain status"),
        }
        Ok(())
    }

    async fn get_status(&self, domain: &str) -> CacheResult<Option<AvailabilityState>> {
        let row: Result<Option<(String,)>, _> =
            sqlx::query_as("SELECT state FROM domain_status WHERE domain = $1")
                .bind(domain)
                .fetch_optional(self.pool.as_ref())
                .await;

        match row {
            Ok(Some((raw,))) => Ok(raw.parse().ok()),
            Ok(None) => Ok(None),
            Err(e) => {
                warn!(%domain, error = %e, "Failed to read domain status");
                Ok(None)
            }
        }
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await.is_ok()
    }
}
