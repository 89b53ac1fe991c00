#![allow(dead_code)]

use axum::{Router, body::Body, http::Response};
use http_body_util::BodyExt;
use pizzerias::catalog::{Catalog, parse_cities, parse_keywords};
use pizzerias::clients::places::{PlacesApi, PlacesError};
use pizzerias::config::Config;
use pizzerias::db::Store;
use pizzerias::models::{PlacesPage, Pizzeria};
use pizzerias::state::SharedState;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

const CITIES: &str = "id,name,province,population
1,Córdoba,Córdoba,1505250
2,Río Cuarto,Córdoba,163048
3,Rosario,Santa Fe,1348725
";

const KEYWORDS: &str = "id,keyword
1,Napolitana
2,A la piedra
";

/// Serves `total` pizzerias in upstream pages of 20, or fails every call.
pub struct FakePlaces {
    total: usize,
    fail: bool,
    calls: AtomicUsize,
}

impl FakePlaces {
    pub fn with_results(total: usize) -> Arc<Self> {
        Arc::new(Self {
            total,
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            total: 0,
            fail: true,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl PlacesApi for FakePlaces {
    async fn search_text(
        &self,
        _query: &str,
        page_token: Option<&str>,
    ) -> Result<PlacesPage, PlacesError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(PlacesError::Api {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                body: "upstream down".to_string(),
            });
        }

        let upstream_page: usize = page_token.map_or(0, |t| t.parse().unwrap());
        let start = upstream_page * 20;
        let end = (start + 20).min(self.total);
        let pizzerias = (start..end).map(pizzeria).collect();
        let next_page_token = (end < self.total).then(|| (upstream_page + 1).to_string());

        Ok(PlacesPage {
            pizzerias,
            next_page_token,
        })
    }
}

/// Answers after `delay_secs`, long enough to trip a short search deadline.
pub struct SlowPlaces {
    delay_secs: u64,
}

impl SlowPlaces {
    pub fn new(delay_secs: u64) -> Arc<Self> {
        Arc::new(Self { delay_secs })
    }
}

#[async_trait::async_trait]
impl PlacesApi for SlowPlaces {
    async fn search_text(
        &self,
        _query: &str,
        _page_token: Option<&str>,
    ) -> Result<PlacesPage, PlacesError> {
        tokio::time::sleep(std::time::Duration::from_secs(self.delay_secs)).await;
        Ok(PlacesPage {
            pizzerias: vec![pizzeria(0)],
            next_page_token: None,
        })
    }
}

pub fn pizzeria(n: usize) -> Pizzeria {
    Pizzeria {
        id: format!("place-{n}"),
        name: format!("Pizzería {n}"),
        address: format!("Avenida Colón {n}, Córdoba"),
        rating: Some(4.4),
        user_ratings_total: Some(120),
        price_level: Some(2),
        types: vec!["restaurant".to_string()],
        phone_number: None,
        website_uri: None,
        opening_hours: None,
        google_maps_url: Some(format!("https://maps.google.com/?cid={n}")),
    }
}

pub fn test_catalog() -> Catalog {
    Catalog::new(parse_cities(CITIES), parse_keywords(KEYWORDS))
}

pub fn temp_db_url() -> String {
    let db_path =
        std::env::temp_dir().join(format!("pizzerias-test-{}.db", uuid::Uuid::new_v4()));
    format!("sqlite:{}", db_path.display())
}

pub struct TestApp {
    pub router: Router,
    pub state: Arc<SharedState>,
}

pub async fn spawn_app(places: Arc<dyn PlacesApi>) -> TestApp {
    spawn_app_with_config(Config::default(), places).await
}

pub async fn spawn_app_with_config(mut config: Config, places: Arc<dyn PlacesApi>) -> TestApp {
    config.general.database_path = temp_db_url();
    let store = Store::new(&config.general.database_path)
        .await
        .expect("failed to open test database");
    build(config, Some(store), places)
}

pub fn spawn_app_without_db(places: Arc<dyn PlacesApi>) -> TestApp {
    build(Config::default(), None, places)
}

fn build(config: Config, store: Option<Store>, places: Arc<dyn PlacesApi>) -> TestApp {
    let state = Arc::new(SharedState::from_parts(
        config,
        store,
        test_catalog(),
        places,
    ));
    let router = pizzerias::api::router(pizzerias::api::create_app_state(state.clone(), None));
    TestApp { router, state }
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}
