//! Repository trait for registrar pricing.

use crate::domain::entities::RegistrarOffer;
use crate::error::AppError;
use async_trait::async_trait;

/// Read-only access to active registrar offers.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgPricingRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_pricing.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PricingRepository: Send + Sync {
    /// Lists active offers for a zone (e.g. `.io`, `.co.jp`).
    ///
    /// Only active registrars with an active price are returned, ordered by
    /// the registrars' display order. Callers rely on that order to break
    /// price ties and to pick between duplicate registrar rows.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_active_offers_by_zone(&self, zone: &str)
    -> Result<Vec<RegistrarOffer>, AppError>;

    /// Counts active registrars. Used by the health check.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_active_registrars(&self) -> Result<i64, AppError>;
}
