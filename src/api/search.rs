use axum::{Json, extract::State};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::validation::{validate_page, validate_required};
use super::{ApiError, AppState, SearchRequest};
use crate::models::SearchPage;


pub async fn search(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchPage>, ApiError> {
    let (Ok(keyword), Ok(city)) = (
        validate_required(request.keyword.as_deref(), "keyword"),
        validate_required(request.city.as_deref(), "city"),
    ) else {
        return Err(ApiError::validation("Keyword and city are required"));
    };
    let page = validate_page(request.page)?;

    info!(keyword, city, page, "Search requested");

    let work = state.search_service().search_or_empty(keyword, city, page);
    let timeout_seconds = state.config().search.timeout_seconds;

    let result = if timeout_seconds == 0 {
        work.await
    } else {
        tokio::time::timeout(Duration::from_secs(timeout_seconds), work)
            .await
            .map_err(|_| {
                ApiError::Timeout(format!("Search did not finish within {timeout_seconds}s"))
            })?
    };

    Ok(Json(result))
}
