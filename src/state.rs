use std::sync::Arc;
use tracing::{error, info, warn};

use crate::catalog::Catalog;
use crate::clients::places::{GooglePlacesClient, PlacesApi};
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    CachePolicy, CacheStore, NullCacheStore, SeaOrmCacheStore, SearchService, SubmissionService,
    VisitCounter,
};

/// Build a shared HTTP client so every upstream call reuses one connection pool.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent(concat!("pizzerias/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

/// Opens the database, or returns `None` so the site can run without one.
async fn open_store(config: &Config) -> Option<Store> {
    match Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await
    {
        Ok(store) => Some(store),
        Err(e) => {
            error!(
                "Database unavailable, running without cache or persistence: {}",
                e
            );
            None
        }
    }
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Option<Store>,

    pub catalog: Arc<Catalog>,

    pub cache: Arc<dyn CacheStore>,

    pub search_service: Arc<SearchService>,

    pub submission_service: Arc<SubmissionService>,

    pub visits: Arc<VisitCounter>,

    pub places_configured: bool,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let http_client =
            build_shared_http_client(config.places.request_timeout_seconds.into())?;
        let places = GooglePlacesClient::with_shared_client(http_client, &config.places);
        if !places.has_api_key() {
            warn!("GOOGLE_API_KEY is not set; searches will return empty results");
        }

        Self::with_places(config, Arc::new(places)).await
    }

    /// Builds the state around a caller-supplied places backend.
    pub async fn with_places(
        config: Config,
        places: Arc<dyn PlacesApi>,
    ) -> anyhow::Result<Self> {
        let store = open_store(&config).await;
        let catalog = Catalog::load(&config.data);
        Ok(Self::from_parts(config, store, catalog, places))
    }

    #[must_use]
    pub fn from_parts(
        config: Config,
        store: Option<Store>,
        catalog: Catalog,
        places: Arc<dyn PlacesApi>,
    ) -> Self {
        let cache: Arc<dyn CacheStore> = match &store {
            Some(store) => Arc::new(SeaOrmCacheStore::new(
                store.clone(),
                CachePolicy::from_config(&config.cache),
            )),
            None => Arc::new(NullCacheStore),
        };

        let search_service = Arc::new(SearchService::new(places, cache.clone(), &config.search));
        let submission_service = Arc::new(SubmissionService::new(store.clone()));
        let visits = Arc::new(VisitCounter::new(store.clone()));
        let places_configured = !config.places.api_key.is_empty();

        info!(
            database = store.is_some(),
            places = places_configured,
            "Application state initialized"
        );

        Self {
            config: Arc::new(config),
            store,
            catalog: Arc::new(catalog),
            cache,
            search_service,
            submission_service,
            visits,
            places_configured,
        }
    }
}
