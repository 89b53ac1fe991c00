use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::catalog::Catalog;
use crate::clients::places::PlacesApi;
use crate::config::Config;
use crate::state::SharedState;

mod admin;
mod catalog;
mod error;
mod health;
mod observability;
mod pages;
mod search;
mod sitemap;
mod submit;
pub mod types;
mod validation;
mod visits;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> Option<&crate::db::Store> {
        self.shared.store.as_ref()
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.shared.catalog
    }

    #[must_use]
    pub fn search_service(&self) -> &Arc<crate::services::SearchService> {
        &self.shared.search_service
    }

    #[must_use]
    pub fn submission_service(&self) -> &Arc<crate::services::SubmissionService> {
        &self.shared.submission_service
    }

    #[must_use]
    pub fn visits(&self) -> &Arc<crate::services::VisitCounter> {
        &self.shared.visits
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<dyn crate::services::CacheStore> {
        &self.shared.cache
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

/// Same as [`create_app_state_from_config`] with an injected places backend.
pub async fn create_app_state_with_places(
    config: Config,
    places: Arc<dyn PlacesApi>,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::with_places(config, places).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let api_router = Router::new()
        .route("/cities", get(catalog::get_cities))
        .route("/keywords", get(catalog::get_keywords))
        .route("/search", post(search::search))
        .route("/submit", post(submit::submit))
        .route("/visits", get(visits::get_visits).post(visits::record_visit))
        .route("/sitemap.xml", get(sitemap::get_sitemap))
        .route("/admin/recreate-cache", post(admin::recreate_cache))
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .route("/metrics", get(observability::get_metrics))
        .fallback(health::api_not_found);

    let page_router = Router::new()
        .route("/", get(pages::home))
        .route("/buscar", get(pages::search_form))
        .route("/provincia/{slug}", get(pages::province))
        .route("/ciudad/{slug}", get(pages::city))
        .route("/pizzerias/{keyword}/{city}", get(pages::keyword_city))
        .route(
            "/pizzerias/{keyword}/{city}/{page}",
            get(pages::keyword_city_page),
        )
        .route("/sitemap.xml", get(sitemap::get_sitemap));

    let cors_layer = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .merge(page_router)
        .fallback(pages::not_found)
        .with_state(state)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}
