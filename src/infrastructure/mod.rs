//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for data persistence, caching and upstream HTTP APIs.
//!
//! # Modules
//!
//! - [`cache`] - Status cache (Redis, PostgreSQL and no-op implementations)
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`providers`] - Suggestion, DNS and RDAP HTTP clients

pub mod cache;
pub mod persistence;
pub mod providers;
