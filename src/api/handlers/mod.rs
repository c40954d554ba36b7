//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod search;
pub mod status;
pub mod whois;

pub use health::health_handler;
pub use search::{search_handler, search_json_handler};
pub use status::status_handler;
pub use whois::whois_handler;
