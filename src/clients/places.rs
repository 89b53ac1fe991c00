use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::PlacesConfig;
use crate::models::{OpeningHours, Pizzeria, PlacesPage};

const FIELD_MASK: &str = "places.id,places.displayName,places.formattedAddress,places.rating,\
places.userRatingCount,places.priceLevel,places.types,places.internationalPhoneNumber,\
places.currentOpeningHours,places.googleMapsUri,places.websiteUri,nextPageToken";

#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("places API key is not configured")]
    MissingApiKey,

    #[error("places request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("places API error: {status} - {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Text search against a places provider, one page per call.
#[async_trait::async_trait]
pub trait PlacesApi: Send + Sync {
    async fn search_text(
        &self,
        query: &str,
        page_token: Option<&str>,
    ) -> Result<PlacesPage, PlacesError>;
}

/// The text query sent upstream for a pizza style in a city.
#[must_use]
pub fn pizzeria_query(keyword: &str, city: &str) -> String {
    format!("Pizzerias de {keyword} en {city}")
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchTextRequest<'a> {
    text_query: &'a str,
    language_code: &'a str,
    page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_token: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchTextResponse {
    #[serde(default)]
    places: Vec<Place>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Place {
    id: String,
    display_name: Option<LocalizedText>,
    formatted_address: Option<String>,
    rating: Option<f32>,
    user_rating_count: Option<u32>,
    price_level: Option<serde_json::Value>,
    #[serde(default)]
    types: Vec<String>,
    international_phone_number: Option<String>,
    website_uri: Option<String>,
    current_opening_hours: Option<PlaceOpeningHours>,
    google_maps_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LocalizedText {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaceOpeningHours {
    #[serde(default, alias = "weekdayText")]
    weekday_descriptions: Vec<String>,
    open_now: Option<bool>,
}

/// The v1 API reports price level as an enum string; older payloads used 0-4.
fn parse_price_level(value: &serde_json::Value) -> Option<u8> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| u8::try_from(n).ok()),
        serde_json::Value::String(s) => match s.as_str() {
            "PRICE_LEVEL_FREE" => Some(0),
            "PRICE_LEVEL_INEXPENSIVE" => Some(1),
            "PRICE_LEVEL_MODERATE" => Some(2),
            "PRICE_LEVEL_EXPENSIVE" => Some(3),
            "PRICE_LEVEL_VERY_EXPENSIVE" => Some(4),
            _ => None,
        },
        _ => None,
    }
}

impl From<Place> for Pizzeria {
    fn from(place: Place) -> Self {
        Self {
            id: place.id,
            name: place
                .display_name
                .map(|d| d.text)
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| "Sin nombre".to_string()),
            address: place
                .formatted_address
                .filter(|addr| !addr.is_empty())
                .unwrap_or_else(|| "Sin dirección".to_string()),
            rating: place.rating,
            user_ratings_total: place.user_rating_count,
            price_level: place.price_level.as_ref().and_then(parse_price_level),
            types: place.types,
            phone_number: place.international_phone_number,
            website_uri: place.website_uri,
            opening_hours: place.current_opening_hours.map(|h| OpeningHours {
                weekday_text: h.weekday_descriptions,
                open_now: h.open_now,
            }),
            google_maps_url: place.google_maps_uri,
        }
    }
}

fn into_page(response: SearchTextResponse) -> PlacesPage {
    PlacesPage {
        pizzerias: response.places.into_iter().map(Pizzeria::from).collect(),
        next_page_token: response.next_page_token.filter(|t| !t.is_empty()),
    }
}

#[derive(Clone)]
pub struct GooglePlacesClient {
    client: Client,
    api_key: String,
    api_url: String,
    language_code: String,
    page_size: u32,
}

impl GooglePlacesClient {
    /// Builds the client around a shared `reqwest::Client` so connections are pooled.
    #[must_use]
    pub fn with_shared_client(client: Client, config: &PlacesConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            api_url: config.api_url.clone(),
            language_code: config.language_code.clone(),
            page_size: config.upstream_page_size,
        }
    }

    #[must_use]
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[async_trait::async_trait]
impl PlacesApi for GooglePlacesClient {
    async fn search_text(
        &self,
        query: &str,
        page_token: Option<&str>,
    ) -> Result<PlacesPage, PlacesError> {
        if !self.has_api_key() {
            return Err(PlacesError::MissingApiKey);
        }

        let body = SearchTextRequest {
            text_query: query,
            language_code: &self.language_code,
            page_size: self.page_size,
            page_token,
        };

        debug!(query, has_token = page_token.is_some(), "Places text search");

        let response = self
            .client
            .post(&self.api_url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PlacesError::Api { status, body });
        }

        let parsed: SearchTextResponse = response.json().await?;
        Ok(into_page(parsed))
    }
}
