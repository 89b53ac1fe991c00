use crate::api::AppState;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "x-request-id";

pub async fn get_metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.prometheus_handle.as_ref() {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "Metrics are disabled").into_response(),
    }
}

/// Collapses slug segments so metric labels stay bounded by route, not by catalog size.
fn route_label(path: &str) -> String {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    match segments.as_slice() {
        [""] => "/".to_string(),
        ["provincia", _] => "/provincia/{slug}".to_string(),
        ["ciudad", _] => "/ciudad/{slug}".to_string(),
        ["pizzerias", _, _] => "/pizzerias/{keyword}/{city}".to_string(),
        ["pizzerias", _, _, _] => "/pizzerias/{keyword}/{city}/{page}".to_string(),
        ["api", ..] | ["buscar"] | ["sitemap.xml"] => path.to_string(),
        _ => "other".to_string(),
    }
}

/// Reuses an upstream proxy's request id when it looks sane, otherwise mints one.
fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= 64)
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_string)
}

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = request_id(req.headers());

    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let route = route_label(&path);
    let surface = if path.starts_with("/api/") { "api" } else { "page" };

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %path,
        surface,
    );

    async move {
        let mut response = next.run(req).await;

        let elapsed = start.elapsed();
        let status = response.status();

        let labels = [
            ("method", method),
            ("route", route),
            ("status", status.as_u16().to_string()),
        ];
        metrics::counter!("http_requests_total", &labels).increment(1);
        metrics::histogram!("http_request_duration_seconds", &labels)
            .record(elapsed.as_secs_f64());

        let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        if status.is_server_error() {
            warn!(status = status.as_u16(), duration_ms, "Request failed");
        } else {
            info!(status = status.as_u16(), duration_ms, "Request finished");
        }

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }

        response
    }
    .instrument(span)
    .await
}

/// JSON-LD blocks are data, not script, so `script-src 'self'` does not affect them.
pub async fn security_headers_middleware(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert(
        "referrer-policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        "content-security-policy",
        HeaderValue::from_static(
            "default-src 'self'; img-src 'self' data: https:; script-src 'self'; \
             style-src 'self' 'unsafe-inline'; frame-ancestors 'none'",
        ),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_label_collapses_slugs() {
        assert_eq!(route_label("/"), "/");
        assert_eq!(route_label("/ciudad/rosario"), "/ciudad/{slug}");
        assert_eq!(
            route_label("/pizzerias/napolitana/cordoba"),
            "/pizzerias/{keyword}/{city}"
        );
        assert_eq!(
            route_label("/pizzerias/napolitana/cordoba/4"),
            "/pizzerias/{keyword}/{city}/{page}"
        );
        assert_eq!(route_label("/api/search"), "/api/search");
        assert_eq!(route_label("/wp-login.php"), "other");
    }

    #[test]
    fn test_request_id_reuses_incoming_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_id(&headers).len(), 36);

        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("edge-42"));
        assert_eq!(request_id(&headers), "edge-42");
    }
}
