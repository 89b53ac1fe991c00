use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;

use super::{ApiError, AppState, HealthDto};

pub async fn live() -> StatusCode {
    StatusCode::OK
}

/// Ready once the catalog has data; reports the database state without requiring it.
pub async fn ready(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthDto>) {
    let database = match state.store() {
        Some(store) => store.ping().await.is_ok(),
        None => false,
    };
    let catalog = state.catalog();
    let ready = !catalog.cities().is_empty() && !catalog.keywords().is_empty();

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthDto {
            status: if ready { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            uptime_seconds: state.start_time.elapsed().as_secs(),
            database,
            places_configured: state.shared.places_configured,
            cities: catalog.cities().len(),
            keywords: catalog.keywords().len(),
        }),
    )
}

pub async fn api_not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}
