use serde::{Serialize, de::DeserializeOwned};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::clients::places::{PlacesApi, PlacesError, pizzeria_query};
use crate::config::SearchConfig;
use crate::models::{CompleteSearchResult, PlacesPage, SearchPage};
use crate::services::cache::{CacheKey, CacheStore};

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("page must be 1 or greater, got {0}")]
    InvalidPage(usize),

    #[error("upstream search failed: {0}")]
    Upstream(#[from] PlacesError),
}

/// Serves paginated pizzeria listings, assembling them from several upstream
/// pages and caching both the pages and the assembled result.
pub struct SearchService {
    places: Arc<dyn PlacesApi>,
    cache: Arc<dyn CacheStore>,
    page_size: usize,
    max_upstream_pages: u32,
}

impl SearchService {
    #[must_use]
    pub fn new(
        places: Arc<dyn PlacesApi>,
        cache: Arc<dyn CacheStore>,
        config: &SearchConfig,
    ) -> Self {
        Self {
            places,
            cache,
            page_size: config.page_size.max(1),
            max_upstream_pages: config.max_upstream_pages.max(1),
        }
    }

    /// Display page `page` (1-based) of the listing for `keyword` in `city`.
    pub async fn search(
        &self,
        keyword: &str,
        city: &str,
        page: usize,
    ) -> Result<SearchPage, SearchError> {
        if page < 1 {
            return Err(SearchError::InvalidPage(page));
        }

        let complete = self.complete_result(keyword, city).await?;
        Ok(complete.page(page, self.page_size))
    }

    /// Like [`Self::search`] but an upstream failure becomes an empty page.
    pub async fn search_or_empty(&self, keyword: &str, city: &str, page: usize) -> SearchPage {
        match self.search(keyword, city, page).await {
            Ok(result) => result,
            Err(e) => {
                warn!(keyword, city, page, error = %e, "Search failed, serving empty result");
                SearchPage::empty(page.max(1))
            }
        }
    }

    pub async fn complete_result(
        &self,
        keyword: &str,
        city: &str,
    ) -> Result<CompleteSearchResult, SearchError> {
        let key = CacheKey::complete(keyword, city);

        if let Some(cached) = self.cached::<CompleteSearchResult>(&key).await {
            debug!(%key, "Serving assembled result from cache");
            return Ok(cached);
        }

        let complete = self.assemble(keyword, city).await?;
        info!(
            keyword,
            city,
            total = complete.total_results,
            upstream_pages = complete.page_tokens.len() + 1,
            "Assembled search result"
        );

        self.store(&key, &complete).await;
        Ok(complete)
    }

    /// Fetches page 1, then follows continuation tokens until none is returned
    /// or the upstream page cap is reached. Only a page 1 failure is fatal.
    async fn assemble(&self, keyword: &str, city: &str) -> Result<CompleteSearchResult, SearchError> {
        let first = self.fetch_page(keyword, city, None).await?;

        let mut pizzerias = first.pizzerias;
        let mut page_tokens = BTreeMap::new();
        let mut next_token = first.next_page_token;
        let mut page_number: u32 = 1;

        while let Some(token) = next_token.take() {
            if page_number >= self.max_upstream_pages {
                break;
            }
            page_number += 1;

            match self.fetch_page(keyword, city, Some(&token)).await {
                Ok(page) => {
                    pizzerias.extend(page.pizzerias);
                    next_token = page.next_page_token;
                    page_tokens.insert(page_number, token);
                }
                Err(e) => {
                    warn!(
                        keyword,
                        city,
                        page = page_number,
                        error = %e,
                        "Upstream page failed, keeping what was fetched"
                    );
                    break;
                }
            }
        }

        Ok(CompleteSearchResult::new(
            pizzerias,
            page_tokens,
            self.page_size,
        ))
    }

    async fn fetch_page(
        &self,
        keyword: &str,
        city: &str,
        token: Option<&str>,
    ) -> Result<PlacesPage, PlacesError> {
        let key = CacheKey::page(keyword, city, token);

        if let Some(cached) = self.cached::<PlacesPage>(&key).await {
            debug!(%key, "Upstream page served from cache");
            return Ok(cached);
        }

        let page = self
            .places
            .search_text(&pizzeria_query(keyword, city), token)
            .await?;
        metrics::counter!("places_requests_total").increment(1);

        self.store(&key, &page).await;
        Ok(page)
    }

    async fn cached<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        match self.cache.get(key).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(parsed) => {
                    metrics::counter!("search_cache_hits_total").increment(1);
                    Some(parsed)
                }
                Err(e) => {
                    warn!(%key, error = %e, "Discarding unreadable cache entry");
                    None
                }
            },
            Ok(None) => {
                metrics::counter!("search_cache_misses_total").increment(1);
                None
            }
            Err(e) => {
                warn!(%key, error = %e, "Cache read failed");
                None
            }
        }
    }

    async fn store<T: Serialize + Sync>(&self, key: &CacheKey, data: &T) {
        let value = match serde_json::to_value(data) {
            Ok(value) => value,
            Err(e) => {
                warn!(%key, error = %e, "Failed to serialize cache entry");
                return;
            }
        };

        if let Err(e) = self.cache.set(key, &value).await {
            warn!(%key, error = %e, "Cache write failed");
        }
    }
}
