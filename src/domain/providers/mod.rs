//! Upstream provider contracts.
//!
//! These traits describe the external services the search pipeline consumes.
//! Concrete HTTP clients live in `crate::infrastructure::providers`; tests use
//! the `mockall` mocks generated under `cfg(test)` or hand-written fakes.
//!
//! # Providers
//!
//! - [`SuggestionProvider`] - Free-text domain suggestions and batched status lookup
//! - [`DnsResolver`] - DNS-based availability heuristic
//! - [`WhoisProvider`] - Registration data lookup for taken domains

use async_trait::async_trait;
use std::collections::HashMap;

use crate::domain::availability::{AvailabilityState, ProviderStatus};

/// Errors reported by upstream providers.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{provider} credential is not configured")]
    MissingCredential { provider: &'static str },

    #[error("{provider} rejected the credential (HTTP {status})")]
    Unauthorized { provider: &'static str, status: u16 },

    #[error("{provider} is unavailable: {reason}")]
    Unavailable {
        provider: &'static str,
        reason: String,
    },

    #[error("{provider} has no record for {subject}")]
    NotFound {
        provider: &'static str,
        subject: String,
    },

    #[error("{provider} returned an invalid response: {reason}")]
    InvalidResponse {
        provider: &'static str,
        reason: String,
    },
}

impl ProviderError {
    /// Name of the provider that failed.
    pub fn provider(&self) -> &'static str {
        match self {
            Self::MissingCredential { provider }
            | Self::Unauthorized { provider, .. }
            | Self::Unavailable { provider, .. }
            | Self::NotFound { provider, .. }
            | Self::InvalidResponse { provider, .. } => provider,
        }
    }

    /// Human-readable remediation for operators.
    pub fn hint(&self) -> String {
        match self {
            Self::MissingCredential { provider } => format!(
                "Configure the {} API key (e.g. DOMAINR_API_KEY) and restart the service",
                provider
            ),
            Self::Unauthorized { provider, .. } => format!(
                "Check that the {} API key is valid and its subscription is active",
                provider
            ),
            Self::Unavailable { provider, .. } | Self::InvalidResponse { provider, .. } => {
                format!("{} could not be reached; retry later", provider)
            }
            Self::NotFound { .. } => "Check the domain spelling".to_string(),
        }
    }
}

/// Domain suggestion and status provider.
///
/// Both operations are idempotent and side-effect free from the caller's
/// point of view.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    /// Returns candidate domains for a free-text query, best match first.
    ///
    /// An empty list is a valid "nothing found" outcome.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::MissingCredential`] or
    /// [`ProviderError::Unauthorized`] when the provider cannot be used at all,
    /// and [`ProviderError::Unavailable`] when it cannot be reached.
    async fn suggest(&self, query: &str) -> Result<Vec<String>, ProviderError>;

    /// Looks up the status of many domains in one call.
    ///
    /// Domains missing from the returned map have no record.
    ///
    /// # Errors
    ///
    /// Same classes as [`SuggestionProvider::suggest`].
    async fn batch_status(
        &self,
        domains: &[String],
    ) -> Result<HashMap<String, ProviderStatus>, ProviderError>;

    /// Returns whether a credential is configured.
    fn is_configured(&self) -> bool;
}

/// DNS-based availability heuristic.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DnsResolver: Send + Sync {
    /// Infers availability from an A-record lookup.
    ///
    /// Never fails: every error path yields [`AvailabilityState::Unknown`].
    async fn check(&self, domain: &str) -> AvailabilityState;
}

/// Registration data lookup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WhoisProvider: Send + Sync {
    /// Returns the provider-specific registration payload for `domain`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotFound`] when the registry has no record and
    /// [`ProviderError::Unavailable`] when the lookup service cannot be reached.
    async fn lookup(&self, domain: &str) -> Result<serde_json::Value, ProviderError>;
}
