//! Repository trait definitions for the domain layer.
//!
//! This module defines the repository interfaces (traits) that abstract data
//! access following the Repository pattern. Implementations live in
//! `crate::infrastructure::persistence`.
//!
//! # Available Repositories
//!
//! - [`PricingRepository`] - Active registrar offers per zone
//! - [`ExchangeRateRepository`] - Currency rates into the base currency
//! - [`HistoryRepository`] - Search audit rows
//!
//! # Testing
//!
//! Mock implementations are auto-generated via `mockall` for unit tests.
//! See `tests/repository_*.rs` for database-backed usage examples.

pub mod exchange_rate_repository;
pub mod history_repository;
pub mod pricing_repository;

pub use exchange_rate_repository::{ExchangeRate, ExchangeRateRepository};
pub use history_repository::HistoryRepository;
pub use pricing_repository::PricingRepository;

#[cfg(test)]
pub use exchange_rate_repository::MockExchangeRateRepository;
#[cfg(test)]
pub use history_repository::MockHistoryRepository;
#[cfg(test)]
pub use pricing_repository::MockPricingRepository;
