//! DTOs for the WHOIS endpoint.

use serde::Serialize;

/// Raw RDAP payload for a domain.
#[derive(Debug, Serialize)]
pub struct WhoisResponse {
    pub domain: String,
    pub data: serde_json::Value,
}
