//! PostgreSQL implementation of the search history repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::availability::AvailabilityState;
use crate::domain::entities::{HistoryEntry, NewHistoryEntry};
use crate::domain::repositories::HistoryRepository;
use crate::error::AppError;

#[derive(Debug, FromRow)]
struct HistoryRow {
    id: i64,
    request_id: Uuid,
    domain: String,
    state: String,
    zone: String,
    query: String,
    language: Option<String>,
    client_ip: Option<String>,
    user_agent: Option<String>,
    created_at: DateTime<Utc>,
}

impl HistoryRow {
    fn into_entry(self) -> HistoryEntry {
        HistoryEntry {
            id: self.id,
            request_id: self.request_id,
            // The column is constrained to the three known values.
            state: self.state.parse().unwrap_or(AvailabilityState::Unknown),
            domain: self.domain,
            zone: self.zone,
            query: self.query,
            language: self.language,
            client_ip: self.client_ip,
            user_agent: self.user_agent,
            created_at: self.created_at,
        }
    }
}

/// PostgreSQL repository for search audit rows.
pub struct PgHistoryRepository {
    pool: Arc<PgPool>,
}

impl PgHistoryRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryRepository for PgHistoryRepository {
    async fn record(&self, entry: NewHistoryEntry) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO search_history
                (request_id, domain, state, zone, query, language, client_ip, user_agent)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(entry.request_id)
        .bind(&entry.domain)
        .bind(entry.state.as_str())
        .bind(&entry.zone)
        .bind(&entry.query)
        .bind(&entry.language)
        .bind(&entry.client_ip)
        .bind(&entry.user_agent)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn update_latest_state(
        &self,
        request_id: Uuid,
        domain: &str,
        query: &str,
        state: AvailabilityState,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE search_history SET state = $4
            WHERE id = (
                SELECT id FROM search_history
                WHERE request_id = $1 AND domain = $2 AND query = $3
                ORDER BY created_at DESC, id DESC
                LIMIT 1
            )
            "#,
        )
        .bind(request_id)
        .bind(domain)
        .bind(query)
        .bind(state.as_str())
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }

    async fn recent(&self, limit: i64) -> Result<Vec<HistoryEntry>, AppError> {
        let rows = sqlx::query_as::<_, HistoryRow>(
            r#"
            SELECT id, request_id, domain, state, zone, query, language, client_ip,
                   user_agent, created_at
            FROM search_history
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(HistoryRow::into_entry).collect())
    }
}
