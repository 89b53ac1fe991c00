use axum::{Json, extract::State, http::HeaderMap};
use std::sync::Arc;
use tracing::info;

use super::{ApiError, AppState, RecreateCacheResponse};

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(expected) = state
        .config()
        .server
        .admin_token
        .as_deref()
        .filter(|t| !t.is_empty())
    else {
        return Ok(());
    };

    let provided = headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());

    if provided == Some(expected) {
        Ok(())
    } else {
        Err(ApiError::Unauthorized("Invalid admin token".to_string()))
    }
}

pub async fn recreate_cache(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<RecreateCacheResponse>, ApiError> {
    authorize(&state, &headers)?;

    if !state.cache().is_persistent() {
        return Err(ApiError::database_unavailable());
    }

    info!("Recreating cache table");
    state
        .cache()
        .recreate()
        .await
        .map_err(|e| ApiError::DatabaseError(format!("Error recreating cache: {e}")))?;
    info!("Cache table recreated");

    Ok(Json(RecreateCacheResponse {
        success: true,
        message: "Cache collection recreated successfully".to_string(),
    }))
}
