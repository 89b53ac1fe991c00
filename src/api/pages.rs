use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use super::validation::parse_page_segment;
use super::{AppState, SearchFormQuery};
use crate::pages::{self, KeywordCityView};

fn not_found_page() -> Response {
    (StatusCode::NOT_FOUND, Html(pages::not_found())).into_response()
}

pub async fn home(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(pages::home(state.catalog(), &state.config().server.base_url))
}

pub async fn search_form(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchFormQuery>,
) -> Response {
    let catalog = state.catalog();

    if let (Some(keyword), Some(city)) = (
        query.keyword.as_deref().and_then(|k| catalog.keyword(k)),
        query.city.as_deref().and_then(|c| catalog.city(c)),
    ) {
        return Redirect::to(&format!("/pizzerias/{}/{}", keyword.slug, city.slug)).into_response();
    }

    Html(pages::search_form(catalog, &state.config().server.base_url)).into_response()
}

pub async fn province(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Response {
    let catalog = state.catalog();
    match catalog.province(&slug) {
        Some(province) => Html(pages::province(
            catalog,
            province,
            &state.config().server.base_url,
        ))
        .into_response(),
        None => not_found_page(),
    }
}

pub async fn city(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    let catalog = state.catalog();
    match catalog.city(&slug) {
        Some(city) => {
            Html(pages::city(catalog, city, &state.config().server.base_url)).into_response()
        }
        None => not_found_page(),
    }
}

async fn render_listing(state: &AppState, keyword_slug: &str, city_slug: &str, page: usize) -> Response {
    let catalog = state.catalog();
    let (Some(keyword), Some(city)) = (catalog.keyword(keyword_slug), catalog.city(city_slug))
    else {
        return not_found_page();
    };

    let results = state
        .search_service()
        .search_or_empty(&keyword.name, &city.name, page)
        .await;

    Html(pages::keyword_city(
        catalog,
        &KeywordCityView {
            keyword,
            city,
            results: &results,
        },
        &state.config().server.base_url,
    ))
    .into_response()
}

pub async fn keyword_city(
    State(state): State<Arc<AppState>>,
    Path((keyword, city)): Path<(String, String)>,
) -> Response {
    render_listing(&state, &keyword, &city, 1).await
}

pub async fn keyword_city_page(
    State(state): State<Arc<AppState>>,
    Path((keyword, city, page)): Path<(String, String, String)>,
) -> Response {
    let catalog = state.catalog();
    match parse_page_segment(&page) {
        // Redirect only to known slugs; raw path segments never reach a header.
        Some(1) => match (catalog.keyword(&keyword), catalog.city(&city)) {
            (Some(keyword), Some(city)) => {
                Redirect::permanent(&format!("/pizzerias/{}/{}", keyword.slug, city.slug))
                    .into_response()
            }
            _ => not_found_page(),
        },
        Some(page) => render_listing(&state, &keyword, &city, page).await,
        None => not_found_page(),
    }
}

pub async fn not_found() -> Response {
    not_found_page()
}
