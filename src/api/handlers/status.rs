//! Handler for cached availability lookups.

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};

use crate::api::dto::search::SearchResultDto;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the last known availability of a domain without calling upstream.
///
/// # Endpoint
///
/// `GET /api/status/{domain}`
///
/// The result is marked `"fresh": false`.
///
/// # Errors
///
/// - **400 Bad Request**: empty domain
/// - **404 Not Found**: nothing cached for the domain
pub async fn status_handler(
    State(state): State<AppState>,
    domain: Result<Path<String>, PathRejection>,
) -> Result<Json<SearchResultDto>, AppError> {
    let Path(domain) = domain?;

    let result = state.search_service.cached_status(&domain).await?;

    Ok(Json(result.into()))
}
