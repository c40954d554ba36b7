//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Database**: Counts active registrars
/// 2. **Cache**: Status cache round trip
/// 3. **History Queue**: Channel open, remaining capacity
/// 4. **Suggestion Provider**: Credential configured
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected, 12 active registrars" },
///     "cache": { "status": "ok", "message": "Status cache reachable" },
///     "history_queue": { "status": "ok", "message": "Capacity: 10000" },
///     "suggestion_provider": { "status": "ok", "message": "Credential configured" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let (database, cache) = tokio::join!(check_database(&state), check_cache(&state));
    let history_queue = check_history_queue(&state);
    let suggestion_provider = check_suggestion_provider(&state);

    let all_healthy = database.is_ok()
        && cache.is_ok()
        && history_queue.is_ok()
        && suggestion_provider.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database,
            cache,
            history_queue,
            suggestion_provider,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_database(state: &AppState) -> CheckStatus {
    match state.pricing_repository.count_active_registrars().await {
        Ok(count) => CheckStatus::ok(format!("Connected, {} active registrars", count)),
        Err(e) => CheckStatus::error(format!("Database error: {}", e)),
    }
}

async fn check_cache(state: &AppState) -> CheckStatus {
    if state.cache.health_check().await {
        CheckStatus::ok("Status cache reachable")
    } else {
        CheckStatus::error("Status cache unreachable")
    }
}

fn check_history_queue(state: &AppState) -> CheckStatus {
    if state.history_sender.is_closed() {
        CheckStatus::error("History queue is closed")
    } else {
        CheckStatus::ok(format!("Capacity: {}", state.history_sender.capacity()))
    }
}

fn check_suggestion_provider(state: &AppState) -> CheckStatus {
    if state.search_service.is_provider_configured() {
        CheckStatus::ok("Credential configured")
    } else {
        CheckStatus::error("DOMAINR_API_KEY is not set")
    }
}
