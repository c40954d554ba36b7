//! HTTP clients for the upstream services consumed by the search pipeline.
//!
//! - [`DomainrClient`] - Suggestions and batched status (RapidAPI-hosted Domainr)
//! - [`DohResolver`] - DNS-over-HTTPS JSON resolver used as the availability fallback
//! - [`RdapClient`] - RDAP registration data for the WHOIS lookup

mod doh;
mod domainr;
mod rdap;

pub use doh::DohResolver;
pub use domainr::DomainrClient;
pub use rdap::RdapClient;

use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("domain-search/", env!("CARGO_PKG_VERSION"));

/// Builds the shared HTTP client used by every upstream provider.
///
/// Falls back to a default client if the tuned builder fails.
pub fn http_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to create tuned HTTP client: {}. Using default.", e);
            Client::new()
        })
}

/// Strips trailing slashes so paths can be appended with `format!`.
fn trim_base(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
