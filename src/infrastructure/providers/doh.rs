//! DNS-over-HTTPS availability heuristic.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::domain::availability::AvailabilityState;
use crate::domain::providers::DnsResolver;

/// DNS response code for "name does not exist".
const RCODE_NXDOMAIN: u32 = 3;
/// Resource record type A.
const RECORD_TYPE_A: u32 = 1;

#[derive(Debug, Deserialize)]
struct DohAnswer {
    #[serde(rename = "Status")]
    status: u32,
    #[serde(rename = "Answer", default)]
    answer: Vec<DohRecord>,
}

#[derive(Debug, Deserialize)]
struct DohRecord {
    #[serde(rename = "type")]
    record_type: u32,
}

impl DohAnswer {
    fn availability(&self) -> AvailabilityState {
        if self.status == RCODE_NXDOMAIN {
            AvailabilityState::Available
        } else if self.answer.iter().any(|r| r.record_type == RECORD_TYPE_A) {
            AvailabilityState::Taken
        } else {
            AvailabilityState::Unknown
        }
    }
}

/// Resolves A records through a public JSON DoH endpoint
/// (`https://dns.google/resolve` compatible).
pub struct DohResolver {
    http: Client,
    resolver_url: String,
}

impl DohResolver {
    pub fn new(http: Client, resolver_url: &str) -> Self {
        Self {
            http,
            resolver_url: resolver_url.to_string(),
        }
    }

    async fn query(&self, domain: &str) -> Result<DohAnswer, reqwest::Error> {
        self.http
            .get(&self.resolver_url)
            .query(&[("name", domain), ("type", "A")])
            .header("Accept", "application/dns-json")
            .send()
            .await?
            .error_for_status()?
            .json::<DohAnswer>()
            .await
    }
}

#[async_trait]
impl DnsResolver for DohResolver {
    async fn check(&self, domain: &str) -> AvailabilityState {
        match self.query(domain).await {
            Ok(answer) => {
                let state = answer.availability();
                debug!(%domain, rcode = answer.status, %state, "DNS fallback answered");
                state
            }
            Err(e) => {
                debug!(%domain, error = %e, "DNS fallback failed");
                AvailabilityState::Unknown
            }
        }
    }
}
