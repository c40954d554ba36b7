//! RDAP registration data client.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use super::trim_base;
use crate::domain::providers::{ProviderError, WhoisProvider};

const PROVIDER: &str = "RDAP";

/// Looks up `{base}/domain/{name}`; the rdap.org bootstrap redirects to the
/// authoritative registry, which reqwest follows.
pub struct RdapClient {
    http: Client,
    base_url: String,
}

impl RdapClient {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: trim_base(base_url),
        }
    }
}

#[async_trait]
impl WhoisProvider for RdapClient {
    async fn lookup(&self, domain: &str) -> Result<serde_json::Value, ProviderError> {
        let url = format!("{}/domain/{}", self.base_url, domain);

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/rdap+json, application/json")
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable {
                provider: PROVIDER,
                reason: e.to_string(),
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                return Err(ProviderError::NotFound {
                    provider: PROVIDER,
                    subject: domain.to_string(),
                });
            }
            s if !s.is_success() => {
                return Err(ProviderError::Unavailable {
                    provider: PROVIDER,
                    reason: format!("HTTP {}", s.as_u16()),
                });
            }
            _ => {}
        }

        debug!(%domain, "RDAP record fetched");

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| ProviderError::InvalidResponse {
                provider: PROVIDER,
                reason: e.to_string(),
            })
    }
}
