use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Pizzeria;

/// One upstream result page as returned by the places adapter.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlacesPage {
    pub pizzerias: Vec<Pizzeria>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// Every pizzeria gathered across the upstream pages for one (keyword, city) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompleteSearchResult {
    pub pizzerias: Vec<Pizzeria>,
    pub total_results: usize,
    /// Upstream page number to the continuation token that fetched it. Page 1 has no token.
    pub page_tokens: BTreeMap<u32, String>,
    /// Number of display pages at the page size used when the result was assembled.
    pub max_pages: usize,
}

impl CompleteSearchResult {
    #[must_use]
    pub fn new(
        pizzerias: Vec<Pizzeria>,
        page_tokens: BTreeMap<u32, String>,
        page_size: usize,
    ) -> Self {
        let total_results = pizzerias.len();
        Self {
            pizzerias,
            total_results,
            page_tokens,
            max_pages: total_results.div_ceil(page_size.max(1)),
        }
    }

    /// Slices display page `page` (1-based). Pages past the end come back empty
    /// but still carry the full `total_results`.
    #[must_use]
    pub fn page(&self, page: usize, page_size: usize) -> SearchPage {
        let page_size = page_size.max(1);
        let page = page.max(1);
        let total_pages = self.total_results.div_ceil(page_size);

        let start = (page - 1).saturating_mul(page_size);
        let pizzerias = if start < self.pizzerias.len() {
            let end = (start + page_size).min(self.pizzerias.len());
            self.pizzerias[start..end].to_vec()
        } else {
            Vec::new()
        };

        let has_more = page < total_pages;

        SearchPage {
            pizzerias,
            total_results: self.total_results,
            next_page_token: has_more.then(|| (page + 1).to_string()),
            page,
            total_pages,
            has_more,
        }
    }
}

/// A single display page served to pages and the JSON API.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub pizzerias: Vec<Pizzeria>,
    pub total_results: usize,
    /// Cursor for the following page; clients pass it back as `page`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    pub page: usize,
    pub total_pages: usize,
    pub has_more: bool,
}

impl SearchPage {
    #[must_use]
    pub const fn empty(page: usize) -> Self {
        Self {
            pizzerias: Vec::new(),
            total_results: 0,
            next_page_token: None,
            page,
            total_pages: 0,
            has_more: false,
        }
    }
}
