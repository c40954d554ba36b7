//! DTOs for the search and cached status endpoints.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_with::{NoneAsEmptyString, serde_as};
use std::sync::LazyLock;
use validator::Validate;

use crate::domain::availability::AvailabilityState;
use crate::domain::entities::{PricedOffer, SearchResponse, SearchResult, WhoisField};

/// BCP 47-ish language tag: `ru`, `en-US`, `pt_BR`.
static LANGUAGE_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{1,8}([-_][A-Za-z0-9]{1,8})*$").unwrap());

/// Search parameters, accepted as a query string (`GET`) or JSON body (`POST`).
///
/// A missing query deserializes as empty and is rejected by the search service,
/// so both forms produce the same error body.
#[serde_as]
#[derive(Debug, Deserialize, Validate)]
pub struct SearchRequest {
    #[serde(default)]
    #[validate(length(max = 253, message = "Query is too long"))]
    pub query: String,

    /// Language tag such as `ru` or `en-US`; defaults to `Accept-Language`.
    /// An empty value counts as absent.
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    #[validate(length(max = 35), regex(path = *LANGUAGE_TAG_REGEX, message = "Invalid language tag"))]
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponseDto {
    pub query: String,
    pub results: Vec<SearchResultDto>,
    pub timestamp: DateTime<Utc>,
}

impl From<SearchResponse> for SearchResponseDto {
    fn from(response: SearchResponse) -> Self {
        Self {
            query: response.query,
            results: response.results.into_iter().map(Into::into).collect(),
            timestamp: response.timestamp,
        }
    }
}

/// One domain in a search response.
///
/// `registrars` is only serialized for available domains and `whois` only
/// for taken ones.
#[derive(Debug, Serialize)]
pub struct SearchResultDto {
    pub domain: String,
    pub zone: String,
    pub status: AvailabilityState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrars: Option<Vec<RegistrarOfferDto>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whois: Option<&'static str>,
    pub fresh: bool,
}

impl From<SearchResult> for SearchResultDto {
    fn from(result: SearchResult) -> Self {
        Self {
            domain: result.domain,
            zone: result.zone,
            status: result.state,
            registrars: result
                .registrars
                .map(|offers| offers.into_iter().map(Into::into).collect()),
            whois: result.whois.map(|w| match w {
                WhoisField::Pending => "pending",
            }),
            fresh: result.fresh,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegistrarOfferDto {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renewal_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_price: Option<f64>,
    pub currency: String,
    /// Price converted into the base currency; offers are sorted by it.
    /// Absent when the offer's currency has no known rate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub register_url: Option<String>,
}

impl From<PricedOffer> for RegistrarOfferDto {
    fn from(priced: PricedOffer) -> Self {
        let offer = priced.offer;
        Self {
            id: offer.registrar_id,
            name: offer.name,
            website: offer.website,
            logo: offer.logo,
            price: offer.price,
            renewal_price: offer.renewal_price,
            transfer_price: offer.transfer_price,
            currency: offer.currency,
            normalized_price: priced.normalized_price,
            register_url: priced.register_url,
        }
    }
}
