//! Application layer services implementing business logic.
//!
//! Services consume the domain layer's collaborator traits and expose a
//! small API to HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::search_service::SearchService`] - The search pipeline
//! - [`services::whois_service::WhoisService`] - On-demand registration data

pub mod services;
