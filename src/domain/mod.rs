//! Domain layer containing search entities and pure decision logic.
//!
//! Nothing in here talks to the network or the database directly; external
//! collaborators are reached through the traits in [`repositories`] and
//! [`providers`].
//!
//! # Architecture
//!
//! - [`availability`] - Availability states and the provider status classifier
//! - [`entities`] - Core data structures
//! - [`offers`] - Registrar offer ranking and currency normalization
//! - [`providers`] - Upstream provider traits
//! - [`repositories`] - Data access trait definitions
//! - [`history_event`] - Audit events sent off the request path
//! - [`history_worker`] - Background persistence of audit events
//!
//! # Audit Flow
//!
//! 1. The search service resolves a candidate
//! 2. A [`history_event::HistoryEvent`] is sent to a bounded channel
//! 3. [`history_worker::run_history_worker`] persists it with retry
//! 4. Failures are logged and dropped, never surfaced to the caller

pub mod availability;
pub mod entities;
pub mod history_event;
pub mod history_worker;
pub mod offers;
pub mod providers;
pub mod repositories;
