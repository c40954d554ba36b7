//! CLI administration tool for domain-search.
//!
//! Runs searches from the terminal, shows the audit trail, and performs
//! database checks without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Run the full search pipeline
//! cargo run --bin admin -- search coffee --language ru
//!
//! # Show the 20 most recent audit rows
//! cargo run --bin admin -- history --limit 20
//!
//! # Check database connection and migrations
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! The same variables as the server (see `domain_search::config`);
//! `DATABASE_URL` is required, `DOMAINR_API_KEY` for `search`.

use domain_search::application::services::SearchInput;
use domain_search::config::{self, Config};
use domain_search::domain::availability::AvailabilityState;
use domain_search::domain::entities::SearchResult;
use domain_search::domain::repositories::HistoryRepository;
use domain_search::infrastructure::persistence::PgHistoryRepository;
use domain_search::server;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// CLI tool for operating domain-search.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Run a search and print the results
    Search {
        /// Free-text query, e.g. "coffee shop"
        query: String,

        /// Request language (e.g. "ru"), drives region augmentation
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Show recent search history
    History {
        /// Number of rows to show
        #[arg(short, long, default_value_t = 20)]
        limit: i64,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection and pending migrations
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    let pool = server::connect_database(&config).await?;

    match cli.command {
        Commands::Search { query, language } => {
            handle_search(&config, pool, query, language).await?
        }
        Commands::History { limit } => handle_history(pool, limit).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Runs the same pipeline as `GET /api/search` and prints a table.
///
/// # Output Format
///
/// ```text
/// 🔎 Search: coffee
///
///   Domain                         Status     Best offer
///   ───────────────────────────────────────────────────────────────
///   coffee.io                      AVAILABLE  Registrar 29.00 USD
///   coffee.com                     TAKEN      whois pending
/// ```
async fn handle_search(
    config: &Config,
    pool: PgPool,
    query: String,
    language: Option<String>,
) -> Result<()> {
    let pool = Arc::new(pool);
    let cache = server::build_cache(config, pool.clone()).await;
    let (history, worker) = server::spawn_history_worker(config, pool.clone());
    let (status_writer, status_worker) = server::spawn_cache_writer(config, cache.clone());
    let service = server::build_search_service(config, pool, cache, status_writer, history);
    let base_currency = service.settings().base_currency.clone();

    println!("{} {}", "🔎 Search:".bright_blue().bold(), query.cyan());
    println!();

    let input = SearchInput::new(query).with_language(language);
    let response = service
        .search(input)
        .await
        .map_err(|e| anyhow::anyhow!("Search failed: {}", e.to_error_info().message))?;

    // Dropping the service closes both queues so the workers can finish.
    drop(service);

    if response.results.is_empty() {
        println!("{}", "  No suggestions found".yellow());
    } else {
        println!(
            "  {:<30} {:<10} {}",
            "Domain".bright_white().bold(),
            "Status".bright_white().bold(),
            "Best offer".bright_white().bold()
        );
        println!("  {}", "─".repeat(75).bright_black());

        for result in &response.results {
            println!(
                "  {:<30} {:<10} {}",
                result.domain.cyan(),
                state_label(result.state),
                offer_summary(result, &base_currency)
            );
        }
    }

    println!();
    println!(
        "  Total: {}",
        response.results.len().to_string().bright_white().bold()
    );
    println!();

    let drained = tokio::time::timeout(Duration::from_secs(5), async {
        let _ = tokio::join!(worker, status_worker);
    })
    .await;
    if drained.is_err() {
        println!("{}", "⚠️  Some history events or cache writes were not stored".yellow());
    }

    Ok(())
}

fn state_label(state: AvailabilityState) -> ColoredString {
    match state {
        AvailabilityState::Available => "AVAILABLE".green(),
        AvailabilityState::Taken => "TAKEN".red(),
        AvailabilityState::Unknown => "UNKNOWN".yellow(),
    }
}

fn offer_summary(result: &SearchResult, base_currency: &str) -> ColoredString {
    match (result.state, result.registrars.as_deref()) {
        (AvailabilityState::Available, Some([best, ..])) => match best.normalized_price {
            Some(price) => format!("{} {:.2} {}", best.offer.name, price, base_currency),
            None => format!(
                "{} {:.2} {}",
                best.offer.name, best.offer.price, best.offer.currency
            ),
        }
        .bright_green(),
        (AvailabilityState::Available, _) => "no offers".bright_black(),
        (AvailabilityState::Taken, _) => "whois pending".bright_black(),
        (AvailabilityState::Unknown, _) => "".normal(),
    }
}

/// Lists the most recent audit rows, newest first.
async fn handle_history(pool: PgPool, limit: i64) -> Result<()> {
    println!("{}", "📜 Search History".bright_blue().bold());
    println!();

    let repo = PgHistoryRepository::new(Arc::new(pool));
    let entries = repo
        .recent(limit.max(1))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load history: {}", e))?;

    if entries.is_empty() {
        println!("{}", "  No searches recorded yet".yellow());
        return Ok(());
    }

    println!(
        "  {:<17} {:<30} {:<10} {:<20} {}",
        "When".bright_white().bold(),
        "Domain".bright_white().bold(),
        "Status".bright_white().bold(),
        "Query".bright_white().bold(),
        "Client".bright_white().bold()
    );
    println!("  {}", "─".repeat(100).bright_black());

    for entry in &entries {
        println!(
            "  {:<17} {:<30} {:<10} {:<20} {}",
            entry
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            entry.domain.cyan(),
            state_label(entry.state),
            entry.query,
            entry.client_ip.as_deref().unwrap_or("-").bright_black()
        );
    }

    println!();
    println!(
        "  Shown: {}",
        entries.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());

            let pending = pending_migrations(pool).await?;
            if pending.is_empty() {
                println!("{}", "✅ All migrations applied".green().bold());
            } else {
                println!(
                    "{}",
                    format!("⚠️  {} pending migration(s):", pending.len()).yellow()
                );
                for name in pending {
                    println!("  - {}", name.bright_white());
                }
                println!("  Start the server once to apply them.");
            }
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let registrars: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM registrars WHERE is_active")
                    .fetch_one(pool)
                    .await
                    .context("Failed to count registrars (are migrations applied?)")?;

            let history: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM search_history")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL:         {}", version.bright_white());
            println!(
                "  Active registrars:  {}",
                registrars.to_string().bright_green().bold()
            );
            println!(
                "  History rows:       {}",
                history.to_string().bright_green().bold()
            );
            println!();
        }
    }

    Ok(())
}

/// Returns `version_description` of every embedded migration not yet applied.
async fn pending_migrations(pool: &PgPool) -> Result<Vec<String>> {
    let table_exists: bool =
        sqlx::query_scalar("SELECT to_regclass('public._sqlx_migrations') IS NOT NULL")
            .fetch_one(pool)
            .await?;

    let applied: HashSet<i64> = if table_exists {
        sqlx::query_scalar::<_, i64>("SELECT version FROM _sqlx_migrations WHERE success")
            .fetch_all(pool)
            .await?
            .into_iter()
            .collect()
    } else {
        HashSet::new()
    };

    let migrator = sqlx::migrate!("./migrations");

    Ok(migrator
        .iter()
        .filter(|m| !m.migration_type.is_down_migration() && !applied.contains(&m.version))
        .map(|m| format!("{}_{}", m.version, m.description))
        .collect())
}
