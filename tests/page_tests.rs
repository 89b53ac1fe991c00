//! HTML page flows: catalog navigation, listings, redirects and 404s.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use common::{FakePlaces, body_string, spawn_app, spawn_app_without_db};
use tower::ServiceExt;

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_home_lists_provinces_and_cities() {
    let app = spawn_app(FakePlaces::with_results(0)).await;

    let response = app.router.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );

    let html = body_string(response).await;
    assert!(html.contains("Encuentra las Mejores Pizzerías en Argentina"));
    assert!(html.contains("href=\"/provincia/cordoba\""));
    assert!(html.contains("href=\"/ciudad/rio-cuarto\""));
}

#[tokio::test]
async fn test_province_and_city_pages() {
    let app = spawn_app(FakePlaces::with_results(0)).await;

    let response = app.router.clone().oneshot(get("/provincia/cordoba")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("<h1>Pizzerías en Córdoba</h1>"));
    assert!(html.contains("href=\"/ciudad/rio-cuarto\""));
    assert!(!html.contains("href=\"/ciudad/rosario\""));

    let response = app.router.clone().oneshot(get("/ciudad/rosario")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Pizzerías en Rosario, Santa Fe"));
    assert!(html.contains("href=\"/pizzerias/napolitana/rosario\""));

    let response = app.router.oneshot(get("/ciudad/atlantida")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_string(response).await.contains("Página no encontrada"));
}

#[tokio::test]
async fn test_listing_page_renders_results_and_pagination() {
    let places = FakePlaces::with_results(25);
    let app = spawn_app(places.clone()).await;

    let response = app
        .router
        .clone()
        .oneshot(get("/pizzerias/napolitana/cordoba"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Las Mejores Pizzerías de Napolitana en Córdoba, Córdoba"));
    assert!(html.contains("Pizzería 0"));
    assert!(!html.contains("Pizzería 10<"));
    assert!(html.contains("href=\"/pizzerias/napolitana/cordoba/3\""));

    let response = app
        .router
        .oneshot(get("/pizzerias/napolitana/cordoba/3"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Página 3"));
    assert!(html.contains("Pizzería 24"));
    assert_eq!(places.calls(), 2);
}

#[tokio::test]
async fn test_listing_page_survives_upstream_failure() {
    let app = spawn_app_without_db(FakePlaces::failing());

    let response = app
        .router
        .oneshot(get("/pizzerias/a-la-piedra/rosario"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Las Mejores Pizzerías de A la piedra en Rosario, Santa Fe"));
    assert!(!html.contains("pizzerías encontradas"));
}

#[tokio::test]
async fn test_listing_page_one_redirects_to_base() {
    let app = spawn_app(FakePlaces::with_results(0)).await;

    let response = app
        .router
        .clone()
        .oneshot(get("/pizzerias/napolitana/cordoba/1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/pizzerias/napolitana/cordoba"
    );

    for uri in [
        "/pizzerias/napolitana/cordoba/0",
        "/pizzerias/napolitana/cordoba/dos",
        "/pizzerias/fugazzeta/cordoba",
        "/pizzerias/napolitana/ushuaia/2",
    ] {
        let response = app.router.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn test_search_form_redirects_known_selection() {
    let app = spawn_app(FakePlaces::with_results(0)).await;

    let response = app.router.clone().oneshot(get("/buscar")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("<h1>Buscar Pizzerías</h1>"));
    assert!(html.contains("<optgroup label=\"Santa Fe\">"));

    let response = app
        .router
        .clone()
        .oneshot(get("/buscar?keyword=a-la-piedra&city=rio-cuarto"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/pizzerias/a-la-piedra/rio-cuarto"
    );

    let response = app
        .router
        .oneshot(get("/buscar?keyword=a-la-piedra&city=lima"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_page_is_not_found() {
    let app = spawn_app(FakePlaces::with_results(0)).await;

    let response = app.router.oneshot(get("/carta")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let html = body_string(response).await;
    assert!(html.contains("Página no encontrada"));
}
