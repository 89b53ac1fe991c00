use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub keyword: Option<String>,
    pub city: Option<String>,
    pub page: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct VisitsResponse {
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub id: i32,
}

#[derive(Debug, Serialize)]
pub struct RecreateCacheResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub database: bool,
    pub places_configured: bool,
    pub cities: usize,
    pub keywords: usize,
}

#[derive(Debug, Deserialize)]
pub struct SearchFormQuery {
    pub keyword: Option<String>,
    pub city: Option<String>,
}
