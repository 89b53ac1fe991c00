use axum::{Json, extract::State};
use std::sync::Arc;

use super::AppState;
use crate::models::{City, Keyword};

pub async fn get_cities(State(state): State<Arc<AppState>>) -> Json<Vec<City>> {
    Json(state.catalog().cities().to_vec())
}

pub async fn get_keywords(State(state): State<Arc<AppState>>) -> Json<Vec<Keyword>> {
    Json(state.catalog().keywords().to_vec())
}
