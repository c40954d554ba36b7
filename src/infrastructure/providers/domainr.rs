//! Domainr suggestion and status client.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};
use url::Url;

use super::trim_base;
use crate::domain::availability::ProviderStatus;
use crate::domain::providers::{ProviderError, SuggestionProvider};

const PROVIDER: &str = "Domainr";

#[derive(Debug, Deserialize)]
struct SearchBody {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    domain: String,
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    #[serde(default)]
    status: Vec<StatusRecord>,
}

#[derive(Debug, Deserialize)]
struct StatusRecord {
    domain: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    summary: Option<String>,
}

/// Client for the RapidAPI-hosted Domainr API.
///
/// Without an API key every call fails with [`ProviderError::MissingCredential`]
/// before touching the network.
pub struct DomainrClient {
    http: Client,
    base_url: String,
    host: String,
    api_key: Option<String>,
    default_zones: Option<String>,
}

impl DomainrClient {
    pub fn new(
        http: Client,
        base_url: &str,
        api_key: Option<String>,
        default_zones: Option<String>,
    ) -> Self {
        let host = Url::parse(base_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| base_url.to_string());

        Self {
            http,
            base_url: trim_base(base_url),
            host,
            api_key: api_key.filter(|k| !k.is_empty()),
            default_zones,
        }
    }

    fn api_key(&self) -> Result<&str, ProviderError> {
        self.api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredential { provider: PROVIDER })
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<reqwest::Response, ProviderError> {
        let key = self.api_key()?;

        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .header("X-RapidAPI-Key", key)
            .header("X-RapidAPI-Host", &self.host)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable {
                provider: PROVIDER,
                reason: e.to_string(),
            })?;

        match response.status() {
            s if s.is_success() => Ok(response),
            s @ (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
                Err(ProviderError::Unauthorized {
                    provider: PROVIDER,
                    status: s.as_u16(),
                })
            }
            s => Err(ProviderError::Unavailable {
                provider: PROVIDER,
                reason: format!("HTTP {}", s.as_u16()),
            }),
        }
    }
}

#[async_trait]
impl SuggestionProvider for DomainrClient {
    async fn suggest(&self, query: &str) -> Result<Vec<String>, ProviderError> {
        let mut params = vec![("query", query)];
        if let Some(zones) = self.default_zones.as_deref() {
            params.push(("defaults", zones));
        }

        let response = self.get("/v2/search", &params).await?;

        let body = match response.json::<SearchBody>().await {
            Ok(body) => body,
            Err(e) => {
                warn!(%query, error = %e, "Undecodable suggestion response, treating as empty");
                return Ok(Vec::new());
            }
        };

        let mut seen = HashSet::new();
        let candidates: Vec<String> = body
            .results
            .into_iter()
            .map(|hit| hit.domain.trim().to_lowercase())
            .filter(|d| !d.is_empty() && seen.insert(d.clone()))
            .collect();

        debug!(%query, count = candidates.len(), "Suggestions received");
        Ok(candidates)
    }

    async fn batch_status(
        &self,
        domains: &[String],
    ) -> Result<HashMap<String, ProviderStatus>, ProviderError> {
        if domains.is_empty() {
            return Ok(HashMap::new());
        }

        let joined = domains.join(",");
        let response = self.get("/v2/status", &[("domain", joined.as_str())]).await?;

        let body = response
            .json::<StatusBody>()
            .await
            .map_err(|e| ProviderError::InvalidResponse {
                provider: PROVIDER,
                reason: e.to_string(),
            })?;

        Ok(body
            .status
            .into_iter()
            .map(|record| {
                (
                    record.domain.to_lowercase(),
                    ProviderStatus::new(record.status.as_deref(), record.summary.as_deref()),
                )
            })
            .collect())
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
