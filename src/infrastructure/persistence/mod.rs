//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx with
//! runtime-checked queries mapped through `FromRow`.
//!
//! # Repositories
//!
//! - [`PgPricingRepository`] - Active registrar offers per zone
//! - [`PgExchangeRateRepository`] - Currency rates
//! - [`PgHistoryRepository`] - Search audit rows

pub mod pg_exchange_rate_repository;
pub mod pg_history_repository;
pub mod pg_pricing_repository;

pub use pg_exchange_rate_repository::PgExchangeRateRepository;
pub use pg_history_repository::PgHistoryRepository;
pub use pg_pricing_repository::PgPricingRepository;
