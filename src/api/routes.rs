//! API route configuration.

use crate::api::handlers::{search_handler, search_json_handler, status_handler, whois_handler};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Public search API routes, mounted under `/api`.
///
/// # Endpoints
///
/// - `GET  /search`           - Search by query string
/// - `POST /search`           - Search with a JSON body
/// - `GET  /whois/{domain}`   - RDAP registration data
/// - `GET  /status/{domain}`  - Last cached availability
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(search_handler).post(search_json_handler))
        .route("/whois/{domain}", get(whois_handler))
        .route("/status/{domain}", get(status_handler))
}
