//! PostgreSQL implementation of the exchange rate repository.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::repositories::{ExchangeRate, ExchangeRateRepository};
use crate::error::AppError;

#[derive(Debug, FromRow)]
struct RateRow {
    currency: String,
    rate: f64,
}

pub struct PgExchangeRateRepository {
    pool: Arc<PgPool>,
}

impl PgExchangeRateRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExchangeRateRepository for PgExchangeRateRepository {
    async fn list_rates(&self, base_currency: &str) -> Result<Vec<ExchangeRate>, AppError> {
        let rows = sqlx::query_as::<_, RateRow>(
            r#"
            SELECT currency::text AS currency, rate
            FROM exchange_rates
            WHERE base_currency = $1
            ORDER BY currency
            "#,
        )
        .bind(base_currency.to_ascii_uppercase())
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ExchangeRate {
                currency: row.currency,
                rate: row.rate,
            })
            .collect())
    }
}
