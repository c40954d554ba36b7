//! Domain search orchestration.
//!
//! One request runs through a fixed sequence of stages:
//!
//! 1. Normalize the query (empty queries are rejected)
//! 2. Fetch suggestions (zero suggestions is a valid empty response)
//! 3. Cap the candidates and look up their status in one batch call
//! 4. Resolve every candidate: classify, fall back to DNS, cache, price, audit
//! 5. Re-check unknown domains once after a short delay
//! 6. Add the regional candidate when the request language matches the rule
//! 7. Stable-sort by state and answer
//!
//! Only suggestion failures surface as errors. Everything else degrades the
//! affected result and the search continues.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use serde_json::json;
use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::availability::{AvailabilityState, ProviderStatus, classify};
use crate::domain::entities::{NewHistoryEntry, PricedOffer, SearchResponse, SearchResult};
use crate::domain::history_event::{HistoryEvent, HistorySink};
use crate::domain::offers::{ExchangeRates, rank_offers};
use crate::domain::providers::{DnsResolver, SuggestionProvider};
use crate::domain::repositories::{ExchangeRateRepository, PricingRepository};
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, StatusWriter};
use crate::utils::client_meta::{
    MAX_CLIENT_IP_LEN, MAX_LANGUAGE_LEN, MAX_USER_AGENT_LEN, truncate_chars,
};
use crate::utils::domain_normalizer::{extract_zone, normalize, regional_candidate};

/// USD per one RUB when no stored rate exists.
pub const DEFAULT_RUB_RATE: f64 = 0.011;

/// Injects one extra candidate in `zone` for requests in `language`.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionRule {
    /// Primary language subtag, lowercase (e.g. `ru`).
    pub language: String,
    /// Zone with leading dot (e.g. `.ru`).
    pub zone: String,
}

impl RegionRule {
    /// Whether a request language such as `ru`, `ru-RU` or `RU_ru` matches the rule.
    pub fn applies(&self, language: Option<&str>) -> bool {
        language
            .and_then(|l| l.split(['-', '_']).next())
            .is_some_and(|primary| primary.trim().eq_ignore_ascii_case(&self.language))
    }
}

/// Policy knobs of the search pipeline.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub max_candidates: usize,
    pub max_offers: usize,
    pub retry_delay: Duration,
    pub deadline: Duration,
    pub concurrency: usize,
    pub region: Option<RegionRule>,
    pub base_currency: String,
    /// Rates used for currencies the exchange-rate store does not know
    /// (base-currency units per one unit). Stored rates take precedence.
    pub fallback_rates: Vec<(String, f64)>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_candidates: 50,
            max_offers: 10,
            retry_delay: Duration::from_secs(1),
            deadline: Duration::from_secs(15),
            concurrency: 8,
            region: Some(RegionRule {
                language: "ru".to_string(),
                zone: ".ru".to_string(),
            }),
            base_currency: "USD".to_string(),
            fallback_rates: vec![("RUB".to_string(), DEFAULT_RUB_RATE)],
        }
    }
}

/// Input of one search.
#[derive(Debug, Clone, Default)]
pub struct SearchInput {
    pub query: String,
    pub language: Option<String>,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
}

impl SearchInput {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }
}

/// Per-request values shared by every stage.
struct RequestContext {
    request_id: Uuid,
    query: String,
    language: Option<String>,
    client_ip: Option<String>,
    user_agent: Option<String>,
    rates: ExchangeRates,
}

impl RequestContext {
    fn history_entry(&self, result: &SearchResult) -> NewHistoryEntry {
        NewHistoryEntry {
            request_id: self.request_id,
            domain: result.domain.clone(),
            state: result.state,
            zone: result.zone.clone(),
            query: self.query.clone(),
            language: self.language.clone(),
            client_ip: self.client_ip.clone(),
            user_agent: self.user_agent.clone(),
        }
    }
}

/// Outcome of re-checking one unknown domain.
struct Recheck {
    domain: String,
    state: AvailabilityState,
    offers: Option<Vec<PricedOffer>>,
}

/// Service running the domain search pipeline.
///
/// Holds no per-request state; concurrent searches share only the cache, the
/// status write queue and the history channel.
pub struct SearchService {
    suggestions: Arc<dyn SuggestionProvider>,
    dns: Arc<dyn DnsResolver>,
    pricing: Arc<dyn PricingRepository>,
    exchange_rates: Arc<dyn ExchangeRateRepository>,
    cache: Arc<dyn CacheService>,
    status_writer: StatusWriter,
    history: HistorySink,
    settings: SearchSettings,
}

impl SearchService {
    pub fn new(
        suggestions: Arc<dyn SuggestionProvider>,
        dns: Arc<dyn DnsResolver>,
        pricing: Arc<dyn PricingRepository>,
        exchange_rates: Arc<dyn ExchangeRateRepository>,
        cache: Arc<dyn CacheService>,
        status_writer: StatusWriter,
        history: HistorySink,
        settings: SearchSettings,
    ) -> Self {
        Self {
            suggestions,
            dns,
            pricing,
            exchange_rates,
            cache,
            status_writer,
            history,
            settings,
        }
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Whether the suggestion provider has a credential.
    pub fn is_provider_configured(&self) -> bool {
        self.suggestions.is_configured()
    }

    /// Runs a full search.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an empty query and
    /// [`AppError::ServiceUnavailable`] when the suggestion provider is
    /// unconfigured, rejects the credential, or cannot be reached.
    pub async fn search(&self, input: SearchInput) -> Result<SearchResponse, AppError> {
        let deadline = Instant::now() + self.settings.deadline;
        metrics::counter!("domain_search_requests_total").increment(1);

        let query = normalize(&input.query);
        if query.is_empty() {
            return Err(AppError::bad_request(
                "Query must not be empty",
                json!({ "field": "query" }),
            ));
        }

        let mut candidates = self.suggestions.suggest(&query).await.map_err(|e| {
            warn!(%query, error = %e, "Suggestion provider failed");
            AppError::from(e)
        })?;

        if candidates.is_empty() {
            info!(%query, "No suggestions found");
            return Ok(SearchResponse {
                query,
                results: Vec::new(),
                timestamp: Utc::now(),
            });
        }

        candidates.truncate(self.settings.max_candidates);

        let ctx = RequestContext {
            request_id: Uuid::new_v4(),
            language: input
                .language
                .as_deref()
                .map(|l| truncate_chars(l.trim(), MAX_LANGUAGE_LEN))
                .filter(|l| !l.is_empty()),
            client_ip: input
                .client_ip
                .as_deref()
                .map(|ip| truncate_chars(ip, MAX_CLIENT_IP_LEN)),
            user_agent: input
                .user_agent
                .as_deref()
                .map(|ua| truncate_chars(ua, MAX_USER_AGENT_LEN)),
            rates: self.load_rates().await,
            query,
        };

        let statuses = self.batch_status_or_inconclusive(&candidates).await;

        let mut results = self.resolve_all(&ctx, &candidates, &statuses).await;

        self.retry_unknown(&ctx, &mut results, deadline).await;

        self.augment_region(&ctx, &mut results, deadline).await;

        results.sort_by_key(|r| r.state);

        for result in &results {
            metrics::counter!("domain_search_results_total", "state" => result.state.as_str())
                .increment(1);
        }

        info!(
            query = %ctx.query,
            request_id = %ctx.request_id,
            results = results.len(),
            "Search completed"
        );

        Ok(SearchResponse {
            query: ctx.query,
            results,
            timestamp: Utc::now(),
        })
    }

    /// Returns the last cached state of `domain` as a non-fresh result.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an empty domain and
    /// [`AppError::NotFound`] when nothing is cached.
    pub async fn cached_status(&self, domain: &str) -> Result<SearchResult, AppError> {
        let domain = normalize(domain);
        if domain.is_empty() {
            return Err(AppError::bad_request(
                "Domain must not be empty",
                json!({ "field": "domain" }),
            ));
        }

        match self.cache.get_status(&domain).await {
            Ok(Some(state)) => Ok(SearchResult::cached(domain, state)),
            Ok(None) => Err(AppError::not_found(
                "No cached status for domain",
                json!({ "domain": domain }),
            )),
            Err(e) => {
                warn!(%domain, error = %e, "Status cache read failed");
                Err(AppError::not_found(
                    "No cached status for domain",
                    json!({ "domain": domain }),
                ))
            }
        }
    }

    async fn load_rates(&self) -> ExchangeRates {
        let mut rates = ExchangeRates::new(self.settings.base_currency.as_str());
        for (currency, rate) in &self.settings.fallback_rates {
            rates.insert(currency, *rate);
        }

        match self.exchange_rates.list_rates(rates.base()).await {
            Ok(stored) => {
                for rate in stored {
                    rates.insert(&rate.currency, rate.rate);
                }
            }
            Err(e) => warn!(error = %e, "Exchange rates unavailable, using fallback rates"),
        }

        rates
    }

    /// A failed batch call leaves every domain inconclusive so each one still
    /// gets a DNS check instead of being dropped.
    async fn batch_status_or_inconclusive(
        &self,
        domains: &[String],
    ) -> HashMap<String, ProviderStatus> {
        match self.suggestions.batch_status(domains).await {
            Ok(statuses) => statuses,
            Err(e) => {
                warn!(count = domains.len(), error = %e, "Batch status failed, falling back to DNS");
                domains
                    .iter()
                    .map(|d| (d.clone(), ProviderStatus::inconclusive()))
                    .collect()
            }
        }
    }

    async fn resolve_all(
        &self,
        ctx: &RequestContext,
        candidates: &[String],
        statuses: &HashMap<String, ProviderStatus>,
    ) -> Vec<SearchResult> {
        let pending: Vec<_> = candidates
            .iter()
            .map(|domain| self.resolve_candidate(ctx, domain, statuses.get(domain)))
            .collect();

        let resolved: Vec<Option<SearchResult>> = stream::iter(pending)
            .buffered(self.settings.concurrency.max(1))
            .collect()
            .await;

        resolved.into_iter().flatten().collect()
    }

    async fn resolve_candidate(
        &self,
        ctx: &RequestContext,
        domain: &str,
        record: Option<&ProviderStatus>,
    ) -> Option<SearchResult> {
        let Some(record) = record else {
            debug!(%domain, "No status record, skipping candidate");
            return None;
        };

        let state = self.effective_state(domain, Some(record)).await;
        let mut result = SearchResult::new(domain, state);

        self.store_status(domain, state);

        if state == AvailabilityState::Available
            && let Some(offers) = self.price(&result.domain, &result.zone, &ctx.rates).await
        {
            result.attach_offers(offers);
        }

        self.history
            .send(HistoryEvent::Record(ctx.history_entry(&result)));

        Some(result)
    }

    async fn effective_state(
        &self,
        domain: &str,
        record: Option<&ProviderStatus>,
    ) -> AvailabilityState {
        match classify(record) {
            AvailabilityState::Unknown => {
                let state = self.dns.check(domain).await;
                debug!(%domain, %state, "Provider inconclusive, used DNS fallback");
                state
            }
            state => state,
        }
    }

    fn store_status(&self, domain: &str, state: AvailabilityState) {
        self.status_writer.send(domain, state);
    }

    async fn price(
        &self,
        domain: &str,
        zone: &str,
        rates: &ExchangeRates,
    ) -> Option<Vec<PricedOffer>> {
        if zone.is_empty() {
            return None;
        }

        match self.pricing.list_active_offers_by_zone(zone).await {
            Ok(offers) => Some(rank_offers(offers, domain, rates, self.settings.max_offers)),
            Err(e) => {
                warn!(%domain, %zone, error = %e, "Pricing lookup failed");
                None
            }
        }
    }

    /// Re-checks unknown results once after the retry delay.
    ///
    /// Updates are computed first and applied only when the whole pass
    /// finishes before the deadline.
    async fn retry_unknown(
        &self,
        ctx: &RequestContext,
        results: &mut [SearchResult],
        deadline: Instant,
    ) {
        let unknown: Vec<String> = results
            .iter()
            .filter(|r| r.state.is_unknown())
            .map(|r| r.domain.clone())
            .collect();

        if unknown.is_empty() {
            return;
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining <= self.settings.retry_delay {
            warn!(
                count = unknown.len(),
                "Deadline too close, skipping unknown retry pass"
            );
            return;
        }

        metrics::counter!("domain_search_retry_passes_total").increment(1);

        let rechecks = match timeout(remaining, self.recheck(ctx, &unknown)).await {
            Ok(rechecks) => rechecks,
            Err(_) => {
                warn!(
                    count = unknown.len(),
                    "Retry pass exceeded deadline, leaving results unknown"
                );
                return;
            }
        };

        for recheck in rechecks {
            let Some(result) = results.iter_mut().find(|r| r.domain == recheck.domain) else {
                continue;
            };

            self.store_status(&result.domain, recheck.state);

            if recheck.state == result.state {
                continue;
            }

            debug!(domain = %result.domain, state = %recheck.state, "Retry resolved domain");
            result.set_state(recheck.state);
            if let Some(offers) = recheck.offers {
                result.attach_offers(offers);
            }

            self.history.send(HistoryEvent::UpdateState {
                request_id: ctx.request_id,
                domain: result.domain.clone(),
                query: ctx.query.clone(),
                state: recheck.state,
            });
        }
    }

    async fn recheck(&self, ctx: &RequestContext, domains: &[String]) -> Vec<Recheck> {
        sleep(self.settings.retry_delay).await;

        let statuses = self.batch_status_or_inconclusive(domains).await;

        let pending: Vec<_> = domains
            .iter()
            .map(|domain| self.recheck_one(ctx, domain, statuses.get(domain)))
            .collect();

        stream::iter(pending)
            .buffered(self.settings.concurrency.max(1))
            .collect()
            .await
    }

    async fn recheck_one(
        &self,
        ctx: &RequestContext,
        domain: &str,
        record: Option<&ProviderStatus>,
    ) -> Recheck {
        let state = self.effective_state(domain, record).await;
        let offers = if state == AvailabilityState::Available {
            self.price(domain, &extract_zone(domain), &ctx.rates).await
        } else {
            None
        };

        Recheck {
            domain: domain.to_string(),
            state,
            offers,
        }
    }

    async fn augment_region(
        &self,
        ctx: &RequestContext,
        results: &mut Vec<SearchResult>,
        deadline: Instant,
    ) {
        let Some(rule) = &self.settings.region else {
            return;
        };
        if !rule.applies(ctx.language.as_deref()) {
            return;
        }
        let Some(candidate) = regional_candidate(&ctx.query, &rule.zone) else {
            return;
        };
        if results.iter().any(|r| r.domain == candidate) {
            debug!(%candidate, "Regional candidate already present");
            return;
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            warn!(%candidate, "Deadline reached, skipping regional candidate");
            return;
        }

        match timeout(remaining, self.resolve_regional(ctx, &candidate)).await {
            Ok(Some(result)) => results.push(result),
            Ok(None) => {}
            Err(_) => warn!(%candidate, "Regional candidate exceeded deadline"),
        }
    }

    async fn resolve_regional(&self, ctx: &RequestContext, candidate: &str) -> Option<SearchResult> {
        let domains = [candidate.to_string()];
        let statuses = self.batch_status_or_inconclusive(&domains).await;

        self.resolve_candidate(ctx, candidate, statuses.get(candidate))
            .await
    }
}
