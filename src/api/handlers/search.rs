//! Handlers for the domain search endpoint.

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use validator::Validate;

use crate::api::dto::search::{SearchRequest, SearchResponseDto};
use crate::application::services::SearchInput;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_meta::ClientMeta;

/// Searches domains for a free-text query.
///
/// # Endpoint
///
/// `GET /api/search?query=coffee&language=ru`
///
/// `language` is optional and falls back to the `Accept-Language` header.
///
/// # Response
///
/// ```json
/// {
///   "query": "coffee",
///   "results": [
///     {
///       "domain": "coffee.io",
///       "zone": ".io",
///       "status": "available",
///       "registrars": [
///         {
///           "id": 1,
///           "name": "Registrar",
///           "price": 29.0,
///           "currency": "USD",
///           "normalized_price": 29.0,
///           "register_url": "https://registrar.example/buy?domain=coffee.io"
///         }
///       ],
///       "fresh": true
///     },
///     { "domain": "coffee.com", "zone": ".com", "status": "taken", "whois": "pending", "fresh": true }
///   ],
///   "timestamp": "2025-01-01T12:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// - **400 Bad Request**: empty or overlong query
/// - **503 Service Unavailable**: suggestion provider unconfigured or unreachable
pub async fn search_handler(
    State(state): State<AppState>,
    client: ClientMeta,
    query: Result<Query<SearchRequest>, QueryRejection>,
) -> Result<Json<SearchResponseDto>, AppError> {
    let Query(request) = query?;
    run_search(&state, client, request).await
}

/// Same as [`search_handler`] with a JSON body.
///
/// # Endpoint
///
/// `POST /api/search`
///
/// ```json
/// { "query": "coffee", "language": "en" }
/// ```
pub async fn search_json_handler(
    State(state): State<AppState>,
    client: ClientMeta,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponseDto>, AppError> {
    let Json(request) = payload?;
    run_search(&state, client, request).await
}

async fn run_search(
    state: &AppState,
    client: ClientMeta,
    request: SearchRequest,
) -> Result<Json<SearchResponseDto>, AppError> {
    request.validate()?;

    let language = request
        .language
        .filter(|l| !l.trim().is_empty())
        .or(client.accept_language);

    let input = SearchInput {
        query: request.query,
        language,
        client_ip: client.ip,
        user_agent: client.user_agent,
    };

    let response = state.search_service.search(input).await?;

    Ok(Json(response.into()))
}
