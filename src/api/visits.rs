use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, AppState, VisitsResponse};

pub async fn get_visits(
    State(state): State<Arc<AppState>>,
) -> Result<Json<VisitsResponse>, ApiError> {
    if !state.visits().is_available() {
        return Err(ApiError::database_unavailable());
    }

    let count = state
        .visits()
        .current()
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
    Ok(Json(VisitsResponse { count }))
}

pub async fn record_visit(
    State(state): State<Arc<AppState>>,
) -> Result<Json<VisitsResponse>, ApiError> {
    if !state.visits().is_available() {
        return Err(ApiError::database_unavailable());
    }

    let count = state
        .visits()
        .record()
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
    Ok(Json(VisitsResponse { count }))
}
