//! WHOIS lookup service backing the `whois: "pending"` placeholder.

use std::sync::Arc;

use serde_json::json;
use tracing::warn;

use crate::domain::providers::WhoisProvider;
use crate::error::AppError;
use crate::utils::domain_normalizer::normalize;

/// Fetches registration data on demand for taken domains.
pub struct WhoisService {
    provider: Arc<dyn WhoisProvider>,
}

impl WhoisService {
    pub fn new(provider: Arc<dyn WhoisProvider>) -> Self {
        Self { provider }
    }

    /// Looks up `domain` after normalizing it.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for an empty or single-label domain
    /// - [`AppError::NotFound`] when the registry has no record
    /// - [`AppError::ServiceUnavailable`] when the lookup service fails
    pub async fn lookup(&self, domain: &str) -> Result<(String, serde_json::Value), AppError> {
        let domain = normalize(domain);
        if domain.is_empty() || !domain.contains('.') {
            return Err(AppError::bad_request(
                "A fully qualified domain is required",
                json!({ "domain": domain }),
            ));
        }

        let payload = self.provider.lookup(&domain).await.map_err(|e| {
            warn!(%domain, error = %e, "WHOIS lookup failed");
            AppError::from(e)
        })?;

        Ok((domain, payload))
    }
}
