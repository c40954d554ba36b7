//! Durable status cache for resolved domains.
//!
//! Provides a [`CacheService`] trait with these implementations:
//! - [`PgStatusCache`] - Durable upserts into the `domain_status` table
//! - [`RedisCache`] - Redis-backed cache with TTL
//! - [`TieredCache`] - Redis read-through layer over [`PgStatusCache`]
//! - [`NullCache`] - No-op implementation for testing/disabled caching
//!
//! Writes from the search pipeline go through [`StatusWriter`], which applies
//! them in order on a single background task.

mod null_cache;
mod pg_status_cache;
mod redis_cache;
mod service;
mod tiered_cache;
mod writer;

pub use null_cache::NullCache;
pub use pg_status_cache::PgStatusCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, CacheService};
pub use tiered_cache::TieredCache;
pub use writer::{StatusUpdate, StatusWriter, run_status_writer, spawn_status_writer};
