use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::services::build_sitemap;

pub async fn get_sitemap(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let xml = build_sitemap(&state.config().server.base_url, state.catalog())
        .map_err(|e| ApiError::internal(format!("Failed to build sitemap: {e}")))?;

    Ok(([(header::CONTENT_TYPE, "application/xml")], xml).into_response())
}
