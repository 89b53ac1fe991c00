//! Search result cache keyed by (keyword, city) with per-bucket expiry.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

use crate::catalog::{fold, slugify};
use crate::config::CacheConfig;
use crate::db::Store;

/// Expiry class of a cache entry, derived from the shape of its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBucket {
    /// One upstream page fetched with (or without) a continuation token.
    Page,
    /// An assembled result set spanning every fetched upstream page.
    Complete,
}

fn hyphenate(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join("-")
}

/// The slug when it spells the whole folded text. Otherwise the slug followed by
/// the percent-encoded lowercased text, so queries the slug would merge stay apart.
fn key_part(text: &str) -> String {
    let slug = slugify(text);

    if !slug.is_empty() && slug == hyphenate(&fold(text)) {
        slug
    } else {
        format!(
            "{slug}~{}",
            urlencoding::encode(&hyphenate(&text.to_lowercase()))
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    value: String,
    bucket: CacheBucket,
}

impl CacheKey {
    /// `page:{keyword}:{city}:{token}`; the first page uses `first` as its token.
    #[must_use]
    pub fn page(keyword: &str, city: &str, token: Option<&str>) -> Self {
        Self {
            value: format!(
                "page:{}:{}:{}",
                key_part(keyword),
                key_part(city),
                token.unwrap_or("first")
            ),
            bucket: CacheBucket::Page,
        }
    }

    /// `complete:{keyword}:{city}`
    #[must_use]
    pub fn complete(keyword: &str, city: &str) -> Self {
        Self {
            value: format!("complete:{}:{}", key_part(keyword), key_part(city)),
            bucket: CacheBucket::Complete,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub const fn bucket(&self) -> CacheBucket {
        self.bucket
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CachePolicy {
    pub page_ttl: chrono::Duration,
    pub complete_ttl: chrono::Duration,
}

impl CachePolicy {
    #[must_use]
    pub fn from_config(config: &CacheConfig) -> Self {
        Self {
            page_ttl: chrono::Duration::minutes(config.page_ttl_minutes),
            complete_ttl: chrono::Duration::hours(config.complete_ttl_hours),
        }
    }

    #[must_use]
    pub const fn max_age(&self, bucket: CacheBucket) -> chrono::Duration {
        match bucket {
            CacheBucket::Page => self.page_ttl,
            CacheBucket::Complete => self.complete_ttl,
        }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}

#[async_trait]
pub trait CacheStore: Send + Sync {
    /// A miss covers both absent and expired entries.
    async fn get(&self, key: &CacheKey) -> Result<Option<Value>>;

    async fn set(&self, key: &CacheKey, data: &Value) -> Result<()>;

    /// Drops every entry and rebuilds the backing table and its indexes.
    async fn recreate(&self) -> Result<()>;

    fn is_persistent(&self) -> bool {
        true
    }
}

pub struct SeaOrmCacheStore {
    store: Store,
    policy: CachePolicy,
}

impl SeaOrmCacheStore {
    #[must_use]
    pub const fn new(store: Store, policy: CachePolicy) -> Self {
        Self { store, policy }
    }
}

#[async_trait]
impl CacheStore for SeaOrmCacheStore {
    async fn get(&self, key: &CacheKey) -> Result<Option<Value>> {
        self.store
            .get_cached(key.as_str(), self.policy.max_age(key.bucket()))
            .await
    }

    async fn set(&self, key: &CacheKey, data: &Value) -> Result<()> {
        self.store.set_cached(key.as_str(), data).await
    }

    async fn recreate(&self) -> Result<()> {
        self.store.recreate_cache().await
    }
}

/// Stand-in used when the database could not be opened at startup.
#[derive(Debug, Default)]
pub struct NullCacheStore;

#[async_trait]
impl CacheStore for NullCacheStore {
    async fn get(&self, _key: &CacheKey) -> Result<Option<Value>> {
        Ok(None)
    }

    async fn set(&self, _key: &CacheKey, _data: &Value) -> Result<()> {
        Ok(())
    }

    async fn recreate(&self) -> Result<()> {
        anyhow::bail!("cache database is not available")
    }

    fn is_persistent(&self) -> bool {
        false
    }
}
