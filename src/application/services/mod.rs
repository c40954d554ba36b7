//! Business logic services for the application layer.

pub mod search_service;
pub mod whois_service;

pub use search_service::{RegionRule, SearchInput, SearchService, SearchSettings};
pub use whois_service::WhoisService;
