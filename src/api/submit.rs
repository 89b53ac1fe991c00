use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header},
};
use std::sync::Arc;

use super::{ApiError, AppState, SubmitResponse};
use crate::services::ClientInfo;
use crate::services::submissions::UNKNOWN_CLIENT;

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// First hop of `x-forwarded-for`, then `x-real-ip`.
fn client_info(headers: &HeaderMap) -> ClientInfo {
    let ip_address = header_value(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| header_value(headers, "x-real-ip"))
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string();

    let user_agent = header_value(headers, header::USER_AGENT.as_str())
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string();

    ClientInfo {
        ip_address,
        user_agent,
    }
}

pub async fn submit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let client = client_info(&headers);
    let id = state.submission_service().submit(body, &client).await?;

    Ok(Json(SubmitResponse { success: true, id }))
}
