//! Repository trait for currency exchange rates.

use crate::error::AppError;
use async_trait::async_trait;

/// A stored conversion rate: one unit of `currency` costs `rate` base units.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRate {
    pub currency: String,
    pub rate: f64,
}

/// Read-only access to exchange rates maintained outside the search service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExchangeRateRepository: Send + Sync {
    /// Lists the latest rate of every currency into `base_currency`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_rates(&self, base_currency: &str) -> Result<Vec<ExchangeRate>, AppError>;
}
