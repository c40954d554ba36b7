//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache setup, provider clients, worker
//! spawning, and Axum server lifecycle. The builders are shared with the
//! `admin` binary so both run the same search pipeline.

use crate::application::services::{SearchService, WhoisService};
use crate::config::Config;
use crate::domain::history_event::HistorySink;
use crate::domain::history_worker::run_history_worker;
use crate::infrastructure::cache::{
    CacheService, PgStatusCache, RedisCache, StatusWriter, TieredCache, spawn_status_writer,
};
use crate::infrastructure::persistence::{
    PgExchangeRateRepository, PgHistoryRepository, PgPricingRepository,
};
use crate::infrastructure::providers::{DohResolver, DomainrClient, RdapClient, http_client};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// How long shutdown waits for queued audit events and cache writes.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens the PostgreSQL pool with the configured limits.
pub async fn connect_database(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

/// Builds the status cache. The PostgreSQL table is always the durable
/// store; when Redis is configured and reachable it is layered in front.
pub async fn build_cache(config: &Config, pool: Arc<PgPool>) -> Arc<dyn CacheService> {
    let durable: Arc<dyn CacheService> = Arc::new(PgStatusCache::new(pool));

    if let Some(redis_url) = &config.redis_url {
        match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
            Ok(redis) => {
                tracing::info!("Status cache enabled (Redis over PostgreSQL)");
                return Arc::new(TieredCache::new(Arc::new(redis), durable));
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using PostgreSQL status cache.", e);
            }
        }
    } else {
        tracing::info!("Status cache enabled (PostgreSQL)");
    }

    durable
}

/// Creates the status write queue and spawns its writer.
pub fn spawn_cache_writer(
    config: &Config,
    cache: Arc<dyn CacheService>,
) -> (StatusWriter, JoinHandle<()>) {
    let (writer, handle) = spawn_status_writer(cache, config.status_queue_capacity);
    tracing::info!("Status writer started");

    (writer, handle)
}

/// Creates the history channel and spawns its worker.
pub fn spawn_history_worker(config: &Config, pool: Arc<PgPool>) -> (HistorySink, JoinHandle<()>) {
    let (history_tx, history_rx) = mpsc::channel(config.history_queue_capacity);
    let repository = Arc::new(PgHistoryRepository::new(pool));

    let handle = tokio::spawn(run_history_worker(history_rx, repository));
    tracing::info!("History worker started");

    (HistorySink::new(history_tx), handle)
}

/// Wires the search pipeline with its PostgreSQL stores and upstream clients.
pub fn build_search_service(
    config: &Config,
    pool: Arc<PgPool>,
    cache: Arc<dyn CacheService>,
    status_writer: StatusWriter,
    history: HistorySink,
) -> SearchService {
    let http = http_client(config.upstream_timeout());

    let suggestions = DomainrClient::new(
        http.clone(),
        &config.domainr_base_url,
        config.domainr_api_key.clone(),
        config.domainr_default_zones.clone(),
    );
    let dns = DohResolver::new(http, &config.dns_resolver_url);

    SearchService::new(
        Arc::new(suggestions),
        Arc::new(dns),
        Arc::new(PgPricingRepository::new(pool.clone())),
        Arc::new(PgExchangeRateRepository::new(pool)),
        cache,
        status_writer,
        history,
        config.search_settings(),
    )
}

pub fn build_whois_service(config: &Config) -> WhoisService {
    let http = http_client(config.upstream_timeout());
    WhoisService::new(Arc::new(RdapClient::new(http, &config.rdap_base_url)))
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Status cache (Redis or PostgreSQL)
/// - Background history worker and status writer
/// - Upstream clients and services
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_database(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to apply migrations")?;

    let pool = Arc::new(pool);
    let cache = build_cache(&config, pool.clone()).await;
    let (history_sender, history_worker) = spawn_history_worker(&config, pool.clone());
    let (status_writer, status_worker) = spawn_cache_writer(&config, cache.clone());

    let search_service = build_search_service(
        &config,
        pool.clone(),
        cache.clone(),
        status_writer,
        history_sender.clone(),
    );
    if !search_service.is_provider_configured() {
        tracing::warn!("DOMAINR_API_KEY is not set; searches will return 503");
    }

    let state = AppState {
        search_service: Arc::new(search_service),
        whois_service: Arc::new(build_whois_service(&config)),
        pricing_repository: Arc::new(PgPricingRepository::new(pool)),
        cache,
        history_sender,
        behind_proxy: config.behind_proxy,
    };

    let app = app_router(state, config.behind_proxy);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address: {}", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router owned every sender; both workers end once their queues drain.
    let drained = tokio::time::timeout(DRAIN_TIMEOUT, async {
        let _ = tokio::join!(history_worker, status_worker);
    })
    .await;
    match drained {
        Ok(()) => tracing::info!("Background writers drained"),
        Err(_) => tracing::warn!("Background writers did not drain in time, pending writes dropped"),
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, finishing in-flight requests");
}
