use serde_json::{Value, json};

use crate::models::{City, Keyword, Province};

pub const SITE_NAME: &str = "Directorio de Pizzerías en Argentina";

#[derive(Debug, Clone, Copy)]
pub enum PageKind<'a> {
    Home,
    Province(&'a Province),
    City(&'a City),
    KeywordCity {
        keyword: &'a Keyword,
        city: &'a City,
        page: usize,
    },
}

/// Head metadata for a rendered page.
#[derive(Debug, Clone)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub canonical: String,
    pub structured_data: Value,
}

impl PageMeta {
    #[must_use]
    pub fn for_page(kind: PageKind<'_>, base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        let canonical = canonical_url(kind, base_url);

        let (title, description, collection_name) = match kind {
            PageKind::Home => (
                "Directorio de Pizzerías en Argentina | Encuentra las Mejores Pizzerías"
                    .to_string(),
                "Encuentra las mejores pizzerías en Argentina. Directorio completo con pizzerías \
                 por ciudad y tipo de pizza. Descubre dónde comer las mejores pizzas."
                    .to_string(),
                None,
            ),
            PageKind::Province(province) => (
                format!("Pizzerías en {} | Guía Completa de Pizzerías", province.name),
                format!(
                    "Directorio de pizzerías en {0}. Descubre las mejores pizzerías por ciudad \
                     en toda la provincia de {0}.",
                    province.name
                ),
                Some(format!("Pizzerías en {}", province.name)),
            ),
            PageKind::City(city) => (
                format!(
                    "Pizzerías en {}, {} | Directorio Completo",
                    city.name, city.province
                ),
                format!(
                    "Guía completa de pizzerías en {0}, {1}. Encuentra los mejores lugares para \
                     comer pizza en {0}.",
                    city.name, city.province
                ),
                Some(format!("Pizzerías en {}, {}", city.name, city.province)),
            ),
            PageKind::KeywordCity {
                keyword,
                city,
                page,
            } => {
                let heading = format!(
                    "Las Mejores Pizzerías de {} en {}, {}",
                    keyword.name, city.name, city.province
                );
                let title = if page > 1 {
                    format!(
                        "Top {} en {}, {} | Página {page}",
                        keyword.name, city.name, city.province
                    )
                } else {
                    heading.clone()
                };
                (
                    title,
                    format!(
                        "Descubre las mejores pizzerías de {0} en {1}, {2}. Top 10 de lugares \
                         para disfrutar de {0} en {1}.",
                        keyword.name, city.name, city.province
                    ),
                    Some(heading),
                )
            }
        };

        let structured_data = match collection_name {
            None => json!({
                "@context": "https://schema.org",
                "@type": "WebSite",
                "name": SITE_NAME,
                "url": base_url,
                "description": description,
            }),
            Some(name) => json!({
                "@context": "https://schema.org",
                "@type": "CollectionPage",
                "name": name,
                "description": description,
                "url": canonical,
                "isPartOf": {
                    "@type": "WebSite",
                    "name": SITE_NAME,
                    "url": base_url,
                },
            }),
        };

        Self {
            title,
            description,
            canonical,
            structured_data,
        }
    }

    #[must_use]
    pub fn not_found() -> Self {
        Self {
            title: "Página no encontrada".to_string(),
            description: "La página que estás buscando no existe.".to_string(),
            canonical: String::new(),
            structured_data: Value::Null,
        }
    }

    #[must_use]
    pub fn search_form(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        Self {
            title: "Buscar Pizzerías | Directorio de Pizzerías en Argentina".to_string(),
            description: "Busca pizzerías por ciudad y tipo de pizza en toda Argentina."
                .to_string(),
            canonical: format!("{base_url}/buscar"),
            structured_data: Value::Null,
        }
    }
}

fn canonical_url(kind: PageKind<'_>, base_url: &str) -> String {
    match kind {
        PageKind::Home => base_url.to_string(),
        PageKind::Province(province) => format!("{base_url}/provincia/{}", province.slug),
        PageKind::City(city) => format!("{base_url}/ciudad/{}", city.slug),
        PageKind::KeywordCity {
            keyword,
            city,
            page,
        } if page > 1 => format!("{base_url}/pizzerias/{}/{}/{page}", keyword.slug, city.slug),
        PageKind::KeywordCity { keyword, city, .. } => {
            format!("{base_url}/pizzerias/{}/{}", keyword.slug, city.slug)
        }
    }
}
