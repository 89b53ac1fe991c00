use serde::Serialize;

use crate::catalog::Catalog;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

#[derive(Debug, Serialize)]
struct UrlSet {
    #[serde(rename = "@xmlns")]
    xmlns: &'static str,
    url: Vec<UrlEntry>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct UrlEntry {
    loc: String,
    changefreq: &'static str,
    priority: &'static str,
}

impl UrlEntry {
    fn new(loc: String, changefreq: &'static str, priority: &'static str) -> Self {
        Self {
            loc,
            changefreq,
            priority,
        }
    }
}

fn entries(base_url: &str, catalog: &Catalog) -> Vec<UrlEntry> {
    let base_url = base_url.trim_end_matches('/');
    let mut urls = vec![UrlEntry::new(base_url.to_string(), "daily", "1.0")];

    urls.extend(catalog.provinces().iter().map(|province| {
        UrlEntry::new(
            format!("{base_url}/provincia/{}", province.slug),
            "weekly",
            "0.8",
        )
    }));

    urls.extend(catalog.cities().iter().map(|city| {
        UrlEntry::new(format!("{base_url}/ciudad/{}", city.slug), "weekly", "0.8")
    }));

    urls.extend(catalog.combinations().map(|(keyword, city)| {
        UrlEntry::new(
            format!("{base_url}/pizzerias/{}/{}", keyword.slug, city.slug),
            "weekly",
            "0.9",
        )
    }));

    urls
}

/// sitemaps.org document: home, every province, every city, every keyword × city.
pub fn build_sitemap(base_url: &str, catalog: &Catalog) -> Result<String, quick_xml::SeError> {
    let urlset = UrlSet {
        xmlns: SITEMAP_NS,
        url: entries(base_url, catalog),
    };

    let body = quick_xml::se::to_string_with_root("urlset", &urlset)?;
    Ok(format!("{XML_DECLARATION}\n{body}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{City, Keyword};

    fn catalog() -> Catalog {
        let cities = vec![
            City {
                id: 1,
                name: "Rosario".to_string(),
                province: "Santa Fe".to_string(),
                population: "1276000".to_string(),
                slug: "rosario".to_string(),
            },
            City {
                id: 2,
                name: "Córdoba".to_string(),
                province: "Córdoba".to_string(),
                population: String::new(),
                slug: "cordoba".to_string(),
            },
        ];
        let keywords = vec![Keyword {
            id: 1,
            name: "Napolitana".to_string(),
            slug: "napolitana".to_string(),
        }];
        Catalog::new(cities, keywords)
    }

    #[test]
    fn test_entries_cover_every_page_kind() {
        let urls = entries("https://example.com/", &catalog());

        assert_eq!(urls.len(), 1 + 2 + 2 + 2);
        assert_eq!(urls[0], UrlEntry::new("https://example.com".to_string(), "daily", "1.0"));
        assert_eq!(urls[1].loc, "https://example.com/provincia/santa-fe");
        assert_eq!(urls[3].loc, "https://example.com/ciudad/rosario");
        assert_eq!(urls[5].loc, "https://example.com/pizzerias/napolitana/rosario");
        assert_eq!(urls[5].priority, "0.9");
    }

    #[test]
    fn test_sitemap_document() {
        let xml = build_sitemap("https://example.com", &catalog()).unwrap();

        assert!(xml.starts_with(XML_DECLARATION));
        assert!(xml.contains(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#));
        assert!(xml.contains(
            "<url><loc>https://example.com/ciudad/cordoba</loc><changefreq>weekly</changefreq><priority>0.8</priority></url>"
        ));
        assert!(xml.ends_with("</urlset>"));
    }

    #[test]
    fn test_empty_catalog_has_only_home() {
        let xml = build_sitemap("https://example.com", &Catalog::default()).unwrap();
        assert_eq!(xml.matches("<url>").count(), 1);
    }
}
