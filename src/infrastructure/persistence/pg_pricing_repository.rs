//! PostgreSQL implementation of the pricing repository.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::RegistrarOffer;
use crate::domain::repositories::PricingRepository;
use crate::error::AppError;

#[derive(Debug, FromRow)]
struct OfferRow {
    registrar_id: i64,
    name: String,
    website: Option<String>,
    affiliate_url_template: Option<String>,
    logo: Option<String>,
    price: f64,
    renewal_price: Option<f64>,
    transfer_price: Option<f64>,
    currency: String,
}

impl From<OfferRow> for RegistrarOffer {
    fn from(row: OfferRow) -> Self {
        Self {
            registrar_id: row.registrar_id,
            name: row.name,
            website: row.website,
            affiliate_url_template: row.affiliate_url_template,
            logo: row.logo,
            price: row.price,
            renewal_price: row.renewal_price,
            transfer_price: row.transfer_price,
            currency: row.currency,
        }
    }
}

/// PostgreSQL repository for registrar offers.
pub struct PgPricingRepository {
    pool: Arc<PgPool>,
}

impl PgPricingRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PricingRepository for PgPricingRepository {
    async fn list_active_offers_by_zone(
        &self,
        zone: &str,
    ) -> Result<Vec<RegistrarOffer>, AppError> {
        let rows = sqlx::query_as::<_, OfferRow>(
            r#"
            SELECT r.id AS registrar_id, r.name, r.website, r.affiliate_url_template, r.logo,
                   p.price, p.renewal_price, p.transfer_price, p.currency::text AS currency
            FROM registrar_prices p
            JOIN registrars r ON r.id = p.registrar_id
            WHERE p.zone = $1 AND p.is_active AND r.is_active
            ORDER BY r.display_order, r.id, p.id
            "#,
        )
        .bind(zone)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(RegistrarOffer::from).collect())
    }

    async fn count_active_registrars(&self) -> Result<i64, AppError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM registrars WHERE is_active")
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(count)
    }
}
