//! Reference data: the cities and pizza-style keywords the site is built from.
//!
//! Both lists come from flat CSV files loaded once at startup and shared
//! read-only through the application state.

mod csv;
mod slug;

pub use csv::{CatalogError, parse_cities, parse_keywords, read_data_file};
pub use slug::{fold, slugify};

use std::path::Path;
use tracing::{error, info};

use crate::config::DataConfig;
use crate::models::{City, Keyword, Province};

pub const CITIES_FILE: &str = "cities.csv";
pub const KEYWORDS_FILE: &str = "keywords.csv";

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    cities: Vec<City>,
    keywords: Vec<Keyword>,
    provinces: Vec<Province>,
}

impl Catalog {
    /// Loads both CSV files. A missing or unreadable file yields an empty list
    /// so the site still renders.
    #[must_use]
    pub fn load(config: &DataConfig) -> Self {
        let dirs = [
            Path::new(&config.primary_dir),
            Path::new(&config.fallback_dir),
        ];

        let cities = match read_data_file(CITIES_FILE, &dirs) {
            Ok(content) => parse_cities(&content),
            Err(e) => {
                error!("Failed to load cities: {}", e);
                Vec::new()
            }
        };

        let keywords = match read_data_file(KEYWORDS_FILE, &dirs) {
            Ok(content) => parse_keywords(&content),
            Err(e) => {
                error!("Failed to load keywords: {}", e);
                Vec::new()
            }
        };

        let catalog = Self::new(cities, keywords);
        info!(
            cities = catalog.cities.len(),
            keywords = catalog.keywords.len(),
            provinces = catalog.provinces.len(),
            "Catalog loaded"
        );
        catalog
    }

    #[must_use]
    pub fn new(cities: Vec<City>, keywords: Vec<Keyword>) -> Self {
        let provinces = group_provinces(&cities);
        Self {
            cities,
            keywords,
            provinces,
        }
    }

    #[must_use]
    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    #[must_use]
    pub fn keywords(&self) -> &[Keyword] {
        &self.keywords
    }

    #[must_use]
    pub fn provinces(&self) -> &[Province] {
        &self.provinces
    }

    #[must_use]
    pub fn city(&self, slug: &str) -> Option<&City> {
        self.cities.iter().find(|c| c.slug == slug)
    }

    #[must_use]
    pub fn keyword(&self, slug: &str) -> Option<&Keyword> {
        self.keywords.iter().find(|k| k.slug == slug)
    }

    #[must_use]
    pub fn province(&self, slug: &str) -> Option<&Province> {
        self.provinces.iter().find(|p| p.slug == slug)
    }

    /// Cities sharing `city`'s province, excluding `city` itself.
    pub fn neighbours<'a>(&'a self, city: &'a City) -> impl Iterator<Item = &'a City> {
        self.cities
            .iter()
            .filter(move |c| c.province == city.province && c.id != city.id)
    }

    /// Every keyword crossed with every city, keyword-major.
    pub fn combinations(&self) -> impl Iterator<Item = (&Keyword, &City)> {
        self.keywords
            .iter()
            .flat_map(move |k| self.cities.iter().map(move |c| (k, c)))
    }
}

/// Groups cities by province, provinces in order of first appearance.
#[must_use]
pub fn group_provinces(cities: &[City]) -> Vec<Province> {
    let mut provinces: Vec<Province> = Vec::new();

    for city in cities {
        if let Some(province) = provinces.iter_mut().find(|p| p.name == city.province) {
            province.cities.push(city.clone());
        } else {
            provinces.push(Province {
                name: city.province.clone(),
                slug: slugify(&city.province),
                cities: vec![city.clone()],
            });
        }
    }

    provinces
}
