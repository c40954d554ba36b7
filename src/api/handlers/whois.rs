//! Handler for the WHOIS lookup endpoint.

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};

use crate::api::dto::whois::WhoisResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns registration data for a taken domain.
///
/// # Endpoint
///
/// `GET /api/whois/{domain}`
///
/// # Errors
///
/// - **400 Bad Request**: empty domain or a bare label without a zone
/// - **404 Not Found**: the registry has no record
/// - **503 Service Unavailable**: the lookup service cannot be reached
pub async fn whois_handler(
    State(state): State<AppState>,
    domain: Result<Path<String>, PathRejection>,
) -> Result<Json<WhoisResponse>, AppError> {
    let Path(domain) = domain?;

    let (domain, data) = state.whois_service.lookup(&domain).await?;

    Ok(Json(WhoisResponse { domain, data }))
}
