//! Server-rendered HTML for the public site.
//!
//! Every function here is pure: it takes already-loaded catalog data and
//! search results and returns a complete document.

mod layout;
mod listing;
mod seo;

pub use layout::Crumb;
pub use listing::page_numbers;
pub use seo::{PageKind, PageMeta};

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::catalog::Catalog;
use crate::models::{City, Keyword, Province, SearchPage};

const HOME_PROVINCES: usize = 4;
const HOME_CITIES: usize = 6;
const HOME_KEYWORDS: usize = 8;
const RELATED_LINKS: usize = 8;

fn home_crumb() -> Crumb {
    Crumb::new("Inicio", "/")
}

fn province_path(province: &str) -> String {
    format!("/provincia/{}", crate::catalog::slugify(province))
}

fn link_list<T>(items: impl Iterator<Item = T>, render: impl Fn(T) -> (String, String)) -> String {
    let links: String = items
        .map(|item| {
            let (href, label) = render(item);
            format!(
                "<li class=\"card\"><a href=\"{}\">{}</a></li>",
                attr(&href),
                text(&label)
            )
        })
        .collect();
    format!("<ul class=\"grid\">{links}</ul>")
}

pub fn home(catalog: &Catalog, base_url: &str) -> String {
    let meta = PageMeta::for_page(PageKind::Home, base_url);

    let provinces = link_list(
        catalog.provinces().iter().take(HOME_PROVINCES),
        |p: &Province| {
            (
                format!("/provincia/{}", p.slug),
                format!("{} ({} ciudades)", p.name, p.cities.len()),
            )
        },
    );
    let cities = link_list(catalog.cities().iter().take(HOME_CITIES), |c: &City| {
        (
            format!("/ciudad/{}", c.slug),
            format!("{}, {}", c.name, c.province),
        )
    });
    let keywords = catalog.cities().first().map_or_else(String::new, |city| {
        link_list(
            catalog.keywords().iter().take(HOME_KEYWORDS),
            |k: &Keyword| {
                (
                    format!("/pizzerias/{}/{}", k.slug, city.slug),
                    k.name.clone(),
                )
            },
        )
    });

    let body = format!(
        "<section><h1>Encuentra las Mejores Pizzerías en Argentina</h1>\
<p>El directorio más completo de pizzerías en Argentina. Busca por ciudad y tipo de pizza.</p>\
<p><a href=\"/buscar\">Buscar Pizzerías</a></p></section>\
<section><h2>Provincias Populares</h2>{provinces}</section>\
<section><h2>Ciudades Principales</h2>{cities}</section>\
<section><h2>Tipos de Pizza Populares</h2>{keywords}</section>\
<section class=\"card\"><h2>Sobre Pizzerías Argentina</h2>\
<p>Bienvenido al directorio más completo de pizzerías en Argentina. Navega por provincias, \
ciudades o tipos de pizza para descubrir nuevos lugares para disfrutar de la mejor pizza argentina.</p>\
</section>"
    );

    layout::render(&meta, &[home_crumb()], &body)
}

pub fn province(catalog: &Catalog, province: &Province, base_url: &str) -> String {
    let meta = PageMeta::for_page(PageKind::Province(province), base_url);
    let name = text(&province.name);

    let cities: String = province
        .cities
        .iter()
        .map(|city| {
            let population = if city.population.is_empty() {
                String::new()
            } else {
                format!("<p>Población: {}</p>", text(&city.population))
            };
            format!(
                "<li class=\"card\"><a href=\"/ciudad/{}\"><h3>{}</h3></a>{population}</li>",
                attr(&city.slug),
                text(&city.name)
            )
        })
        .collect();

    let others = link_list(
        catalog
            .provinces()
            .iter()
            .filter(|p| p.slug != province.slug)
            .take(RELATED_LINKS),
        |p: &Province| (format!("/provincia/{}", p.slug), p.name.clone()),
    );

    let body = format!(
        "<h1>Pizzerías en {name}</h1>\
<p class=\"card\">Descubre las mejores pizzerías en {name}. Explora por ciudad para encontrar \
las mejores pizzerías en cada localidad de {name}.</p>\
<section><h2>Ciudades en {name}</h2><ul class=\"grid\">{cities}</ul></section>\
<section class=\"card\"><h2>Sobre {name}</h2><p>Con {count} ciudades principales, {name} ofrece \
una gran variedad de pizzerías, cada una con su estilo único y especialidades locales.</p></section>\
<section><h2>Otras Provincias</h2>{others}</section>",
        count = province.cities.len(),
    );

    let crumbs = [
        home_crumb(),
        Crumb::new(province.name.clone(), format!("/provincia/{}", province.slug)),
    ];
    layout::render(&meta, &crumbs, &body)
}

pub fn city(catalog: &Catalog, city: &City, base_url: &str) -> String {
    let meta = PageMeta::for_page(PageKind::City(city), base_url);
    let name = text(&city.name);
    let province_name = text(&city.province);

    let keywords = link_list(catalog.keywords().iter(), |k: &Keyword| {
        (
            format!("/pizzerias/{}/{}", k.slug, city.slug),
            format!("{} en {}", k.name, city.name),
        )
    });
    let neighbours = link_list(
        catalog.neighbours(city).take(RELATED_LINKS),
        |c: &City| (format!("/ciudad/{}", c.slug), c.name.clone()),
    );

    let population = if city.population.is_empty() {
        String::new()
    } else {
        format!(
            " Con una población de aproximadamente {} habitantes, es un lugar con una rica \
             tradición gastronómica.",
            text(&city.population)
        )
    };

    let body = format!(
        "<h1>Pizzerías en {name}, {province_name}</h1>\
<p class=\"card\">Descubre las mejores pizzerías en {name}, {province_name}. Explora por tipo de \
pizza o navega por nuestra selección de las mejores pizzerías de la ciudad.</p>\
<section><h2>Tipos de Pizza en {name}</h2>{keywords}</section>\
<section class=\"card\"><h2>Sobre {name}</h2><p>{name} es una ciudad ubicada en {province_name}, \
Argentina.{population}</p></section>\
<section><h2>Otras Ciudades en {province_name}</h2>{neighbours}</section>"
    );

    let crumbs = [
        home_crumb(),
        Crumb::new(city.province.clone(), province_path(&city.province)),
        Crumb::new(city.name.clone(), format!("/ciudad/{}", city.slug)),
    ];
    layout::render(&meta, &crumbs, &body)
}

/// Everything the keyword × city listing needs besides the catalog.
pub struct KeywordCityView<'a> {
    pub keyword: &'a Keyword,
    pub city: &'a City,
    pub results: &'a SearchPage,
}

pub fn keyword_city(catalog: &Catalog, view: &KeywordCityView<'_>, base_url: &str) -> String {
    let KeywordCityView {
        keyword,
        city,
        results,
    } = *view;
    let page = results.page;

    let meta = PageMeta::for_page(
        PageKind::KeywordCity {
            keyword,
            city,
            page,
        },
        base_url,
    );

    let keyword_name = text(&keyword.name);
    let city_name = text(&city.name);
    let province_name = text(&city.province);
    let page_suffix = if page > 1 {
        format!(" - Página {page}")
    } else {
        String::new()
    };

    let base_path = format!("/pizzerias/{}/{}", keyword.slug, city.slug);
    let summary = if results.total_results > 0 {
        format!(
            "<p>{} pizzerías encontradas, página {page} de {}.</p>",
            results.total_results,
            results.total_pages.max(1)
        )
    } else {
        String::new()
    };

    let other_cities = link_list(
        catalog
            .cities()
            .iter()
            .filter(|c| c.id != city.id)
            .take(RELATED_LINKS),
        |c: &City| {
            (
                format!("/pizzerias/{}/{}", keyword.slug, c.slug),
                format!("{} en {}", keyword.name, c.name),
            )
        },
    );
    let other_keywords = link_list(
        catalog
            .keywords()
            .iter()
            .filter(|k| k.id != keyword.id)
            .take(RELATED_LINKS),
        |k: &Keyword| {
            (
                format!("/pizzerias/{}/{}", k.slug, city.slug),
                format!("{} en {}", k.name, city.name),
            )
        },
    );

    let body = format!(
        "<h1>Las Mejores Pizzerías de {keyword_name} en {city_name}, {province_name}{page_suffix}</h1>\
<p class=\"card\">Descubre las mejores pizzerías de {keyword_name} en {city_name}. Hemos recopilado \
una lista de los mejores lugares para disfrutar de {keyword_name} en {city_name}, {province_name}.</p>\
<section><h2>Pizzerías de {keyword_name} en {city_name}{page_suffix}</h2>{summary}{grid}{pagination}</section>\
<section><h2>Explora Más Opciones</h2>\
<h3>Otras ciudades con {keyword_name}</h3>{other_cities}\
<h3>Otros tipos de pizza en {city_name}</h3>{other_keywords}</section>",
        grid = listing::pizzeria_grid(&results.pizzerias),
        pagination = listing::pagination(page, results.total_pages, &base_path),
    );

    let crumbs = [
        home_crumb(),
        Crumb::new(city.province.clone(), province_path(&city.province)),
        Crumb::new(city.name.clone(), format!("/ciudad/{}", city.slug)),
        Crumb::new(keyword.name.clone(), base_path.clone()),
    ];
    layout::render(&meta, &crumbs, &body)
}

/// The keyword/city picker. Submitting it comes back to `/buscar` with both
/// query parameters, which the handler turns into a redirect.
pub fn search_form(catalog: &Catalog, base_url: &str) -> String {
    let meta = PageMeta::search_form(base_url);

    let keyword_options: String = catalog
        .keywords()
        .iter()
        .map(|k| {
            format!(
                "<option value=\"{}\">{}</option>",
                attr(&k.slug),
                text(&k.name)
            )
        })
        .collect();

    let city_groups: String = catalog
        .provinces()
        .iter()
        .map(|p| {
            let options: String = p
                .cities
                .iter()
                .map(|c| {
                    format!(
                        "<option value=\"{}\">{}</option>",
                        attr(&c.slug),
                        text(&c.name)
                    )
                })
                .collect();
            format!("<optgroup label=\"{}\">{options}</optgroup>", attr(&p.name))
        })
        .collect();

    let body = format!(
        "<h1>Buscar Pizzerías</h1>\
<form class=\"card\" method=\"get\" action=\"/buscar\">\
<label for=\"keyword\">Tipo de pizza</label>\
<select id=\"keyword\" name=\"keyword\" required><option value=\"\">Selecciona un tipo de pizza</option>{keyword_options}</select>\
<label for=\"city\">Ciudad</label>\
<select id=\"city\" name=\"city\" required><option value=\"\">Selecciona una ciudad</option>{city_groups}</select>\
<button type=\"submit\">Buscar</button>\
</form>"
    );

    layout::render(&meta, &[home_crumb(), Crumb::new("Buscar", "/buscar")], &body)
}

pub fn not_found() -> String {
    layout::render(
        &PageMeta::not_found(),
        &[],
        "<h1>Página no encontrada</h1>\
<p>La página que estás buscando no existe.</p>\
<p><a href=\"/\">Volver al inicio</a></p>",
    )
}
