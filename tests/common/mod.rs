#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::ConnectInfo;
use serde_json::{Value, json};
use sqlx::PgPool;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tower::Layer;

use domain_search::application::services::{SearchService, SearchSettings, WhoisService};
use domain_search::domain::availability::{AvailabilityState, ProviderStatus};
use domain_search::domain::entities::RegistrarOffer;
use domain_search::domain::history_event::{HistoryEvent, HistorySink};
use domain_search::domain::providers::{
    DnsResolver, ProviderError, SuggestionProvider, WhoisProvider,
};
use domain_search::domain::repositories::{
    ExchangeRate, ExchangeRateRepository, PricingRepository,
};
use domain_search::error::AppError;
use domain_search::infrastructure::cache::{
    CacheError, CacheResult, CacheService, spawn_status_writer,
};
use domain_search::state::AppState;

// ── In-memory collaborators ─────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeSuggestions {
    pub configured: bool,
    pub suggestions: Vec<String>,
    pub statuses: HashMap<String, ProviderStatus>,
}

#[async_trait]
impl SuggestionProvider for FakeSuggestions {
    async fn suggest(&self, _query: &str) -> Result<Vec<String>, ProviderError> {
        if !self.configured {
            return Err(ProviderError::MissingCredential { provider: "Domainr" });
        }
        Ok(self.suggestions.clone())
    }

    async fn batch_status(
        &self,
        domains: &[String],
    ) -> Result<HashMap<String, ProviderStatus>, ProviderError> {
        Ok(domains
            .iter()
            .filter_map(|d| self.statuses.get(d).map(|s| (d.clone(), s.clone())))
            .collect())
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}

#[derive(Default)]
pub struct FakeDns {
    pub answers: HashMap<String, AvailabilityState>,
}

#[async_trait]
impl DnsResolver for FakeDns {
    async fn check(&self, domain: &str) -> AvailabilityState {
        self.answers
            .get(domain)
            .copied()
            .unwrap_or(AvailabilityState::Unknown)
    }
}

pub struct FakePricing {
    pub healthy: bool,
    pub offers: HashMap<String, Vec<RegistrarOffer>>,
}

impl Default for FakePricing {
    fn default() -> Self {
        Self {
            healthy: true,
            offers: HashMap::new(),
        }
    }
}

#[async_trait]
impl PricingRepository for FakePricing {
    async fn list_active_offers_by_zone(
        &self,
        zone: &str,
    ) -> Result<Vec<RegistrarOffer>, AppError> {
        if !self.healthy {
            return Err(AppError::internal("Database error", json!({})));
        }
        Ok(self.offers.get(zone).cloned().unwrap_or_default())
    }

    async fn count_active_registrars(&self) -> Result<i64, AppError> {
        if !self.healthy {
            return Err(AppError::internal("Database error", json!({})));
        }
        Ok(self.offers.values().flatten().count() as i64)
    }
}

#[derive(Default)]
pub struct FakeRates {
    pub rates: Vec<ExchangeRate>,
}

#[async_trait]
impl ExchangeRateRepository for FakeRates {
    async fn list_rates(&self, _base_currency: &str) -> Result<Vec<ExchangeRate>, AppError> {
        Ok(self.rates.clone())
    }
}

#[derive(Default)]
pub struct FakeWhois {
    pub records: HashMap<String, Value>,
    pub unavailable: bool,
}

#[async_trait]
impl WhoisProvider for FakeWhois {
    async fn lookup(&self, domain: &str) -> Result<Value, ProviderError> {
        if self.unavailable {
            return Err(ProviderError::Unavailable {
                provider: "RDAP",
                reason: "connection refused".to_string(),
            });
        }
        self.records
            .get(domain)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound {
                provider: "RDAP",
                subject: domain.to_string(),
            })
    }
}

pub struct MemoryCache {
    pub healthy: bool,
    entries: Mutex<HashMap<String, AvailabilityState>>,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self {
            healthy: true,
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl MemoryCache {
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::default()
        }
    }

    pub fn seed(&self, domain: &str, state: AvailabilityState) {
        self.entries
            .lock()
            .unwrap()
            .insert(domain.to_string(), state);
    }

    pub fn get(&self, domain: &str) -> Option<AvailabilityState> {
        self.entries.lock().unwrap().get(domain).copied()
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn set_status(&self, domain: &str, state: AvailabilityState) -> CacheResult<()> {
        if !self.healthy {
            return Err(CacheError::ConnectionError("cache down".to_string()));
        }
        self.seed(domain, state);
        Ok(())
    }

    async fn get_status(&self, domain: &str) -> CacheResult<Option<AvailabilityState>> {
        if !self.healthy {
            return Err(CacheError::ConnectionError("cache down".to_string()));
        }
        Ok(self.get(domain))
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }
}

// ── Fixture builders ────────────────────────────────────────────────────────

pub fn offer(id: i64, name: &str, price: f64, currency: &str) -> RegistrarOffer {
    RegistrarOffer {
        registrar_id: id,
        name: name.to_string(),
        website: Some(format!("https://{}.example", name.to_lowercase())),
        affiliate_url_template: Some(format!(
            "https://{}.example/buy?domain={{domain}}",
            name.to_lowercase()
        )),
        logo: None,
        price,
        renewal_price: None,
        transfer_price: None,
        currency: currency.to_string(),
    }
}

pub fn status(summary: &str) -> ProviderStatus {
    ProviderStatus::new(None, Some(summary))
}

/// Settings with short timings so retry passes finish quickly in real time.
pub fn fast_settings() -> SearchSettings {
    SearchSettings {
        retry_delay: Duration::from_millis(10),
        deadline: Duration::from_secs(2),
        ..SearchSettings::default()
    }
}

/// All collaborators behind one [`AppState`].
pub struct TestBackend {
    pub suggestions: FakeSuggestions,
    pub dns: FakeDns,
    pub pricing: FakePricing,
    pub rates: FakeRates,
    pub whois: FakeWhois,
    pub cache: Arc<MemoryCache>,
    pub settings: SearchSettings,
    pub queue_capacity: usize,
}

impl Default for TestBackend {
    fn default() -> Self {
        Self {
            suggestions: FakeSuggestions {
                configured: true,
                ..FakeSuggestions::default()
            },
            dns: FakeDns::default(),
            pricing: FakePricing::default(),
            rates: FakeRates::default(),
            whois: FakeWhois::default(),
            cache: Arc::new(MemoryCache::default()),
            settings: fast_settings(),
            queue_capacity: 100,
        }
    }
}

impl TestBackend {
    /// Coffee scenario: one taken, one available with two offers, one without record.
    pub fn coffee() -> Self {
        let mut backend = Self::default();
        backend.suggestions.suggestions = vec![
            "coffee.com".to_string(),
            "coffee.io".to_string(),
            "coffee.xyz".to_string(),
        ];
        backend.suggestions.statuses = HashMap::from([
            ("coffee.com".to_string(), status("active")),
            ("coffee.io".to_string(), status("inactive")),
        ]);
        backend.pricing.offers = HashMap::from([(
            ".io".to_string(),
            vec![offer(1, "Pricey", 59.0, "USD"), offer(2, "Cheap", 29.0, "USD")],
        )]);
        backend
    }

    pub fn into_state(self) -> (AppState, mpsc::Receiver<HistoryEvent>) {
        let (tx, rx) = mpsc::channel(self.queue_capacity);
        let history = HistorySink::new(tx);
        let pricing: Arc<dyn PricingRepository> = Arc::new(self.pricing);
        // The writer task ends on its own once the service is dropped.
        let (status_writer, _writer) = spawn_status_writer(self.cache.clone(), self.queue_capacity);

        let search_service = SearchService::new(
            Arc::new(self.suggestions),
            Arc::new(self.dns),
            pricing.clone(),
            Arc::new(self.rates),
            self.cache.clone(),
            status_writer,
            history.clone(),
            self.settings,
        );

        let state = AppState {
            search_service: Arc::new(search_service),
            whois_service: Arc::new(WhoisService::new(Arc::new(self.whois))),
            pricing_repository: pricing,
            cache: self.cache,
            history_sender: history,
            behind_proxy: false,
        };

        (state, rx)
    }
}

/// Drains every event currently queued.
pub fn drain(rx: &mut mpsc::Receiver<HistoryEvent>) -> Vec<HistoryEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

// ── Connection info for handlers that read the peer address ─────────────────

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

// ── Database fixtures ───────────────────────────────────────────────────────

pub async fn create_registrar(pool: &PgPool, name: &str, display_order: i32, active: bool) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO registrars (name, website, affiliate_url_template, display_order, is_active)
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(name)
    .bind(format!("https://{}.example", name.to_lowercase()))
    .bind(format!("https://{}.example/buy?d={{domain}}", name.to_lowercase()))
    .bind(display_order)
    .bind(active)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_price(
    pool: &PgPool,
    registrar_id: i64,
    zone: &str,
    price: f64,
    currency: &str,
    active: bool,
) {
    sqlx::query(
        "INSERT INTO registrar_prices (registrar_id, zone, price, currency, is_active)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(registrar_id)
    .bind(zone)
    .bind(price)
    .bind(currency)
    .bind(active)
    .execute(pool)
    .await
    .unwrap();
}
