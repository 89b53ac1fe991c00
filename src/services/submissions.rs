use serde_json::{Map, Value};
use thiserror::Error;
use tracing::info;

use crate::db::{NewSubmission, Store};

pub const UNKNOWN_CLIENT: &str = "unknown";

const REQUIRED_FIELDS: [&str; 3] = ["name", "email", "message"];

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Name, email, and message are required")]
    MissingFields,

    #[error("submission body must be a JSON object")]
    InvalidBody,

    #[error("submissions database is not available")]
    Unavailable,

    #[error("failed to save submission: {0}")]
    Database(#[from] anyhow::Error),
}

/// What the HTTP layer knows about the sender, before the body is consulted.
#[derive(Debug, Clone)]
pub struct ClientInfo {
    pub ip_address: String,
    pub user_agent: String,
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self {
            ip_address: UNKNOWN_CLIENT.to_string(),
            user_agent: UNKNOWN_CLIENT.to_string(),
        }
    }
}

/// Required fields must be non-blank strings.
fn required_field(body: &Map<String, Value>, field: &str) -> Option<String> {
    match body.get(field)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn text_field(body: &Map<String, Value>, field: &str) -> Option<String> {
    match body.get(field)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Checks the required fields and builds the record to persist. Values the
/// body already carries for `ipAddress` and `userAgent` win over `client`.
pub fn prepare(body: Value, client: &ClientInfo) -> Result<NewSubmission, SubmissionError> {
    let Value::Object(mut body) = body else {
        return Err(SubmissionError::InvalidBody);
    };

    if REQUIRED_FIELDS
        .iter()
        .any(|field| required_field(&body, field).is_none())
    {
        return Err(SubmissionError::MissingFields);
    }

    let ip_address =
        text_field(&body, "ipAddress").unwrap_or_else(|| client.ip_address.clone());
    let user_agent =
        text_field(&body, "userAgent").unwrap_or_else(|| client.user_agent.clone());
    let submitted_at = chrono::Utc::now().to_rfc3339();

    body.insert("ipAddress".to_string(), Value::String(ip_address.clone()));
    body.insert("userAgent".to_string(), Value::String(user_agent.clone()));
    body.insert(
        "submittedAt".to_string(),
        Value::String(submitted_at.clone()),
    );

    Ok(NewSubmission {
        name: required_field(&body, "name").unwrap_or_default(),
        email: required_field(&body, "email").unwrap_or_default(),
        message: required_field(&body, "message").unwrap_or_default(),
        phone: text_field(&body, "phone"),
        city: text_field(&body, "city"),
        ip_address,
        user_agent,
        payload: Value::Object(body),
        submitted_at,
    })
}

pub struct SubmissionService {
    store: Option<Store>,
}

impl SubmissionService {
    #[must_use]
    pub const fn new(store: Option<Store>) -> Self {
        Self { store }
    }

    pub async fn submit(&self, body: Value, client: &ClientInfo) -> Result<i32, SubmissionError> {
        let submission = prepare(body, client)?;
        let store = self.store.as_ref().ok_or(SubmissionError::Unavailable)?;

        let id = store.add_submission(submission).await?;
        info!(id, "Contact form submission saved");
        metrics::counter!("submissions_total").increment(1);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::EntityTrait;
    use serde_json::json;

    fn client() -> ClientInfo {
        ClientInfo {
            ip_address: "198.51.100.4".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
        }
    }

    #[test]
    fn test_missing_required_fields() {
        for body in [
            json!({ "email": "a@b.com", "message": "hola" }),
            json!({ "name": "Ana", "message": "hola" }),
            json!({ "name": "Ana", "email": "a@b.com" }),
            json!({ "name": "", "email": "a@b.com", "message": "hola" }),
            json!({ "name": null, "email": "a@b.com", "message": "hola" }),
            json!({ "name": 0, "email": "a@b.com", "message": "hola" }),
            json!({ "name": "Ana", "email": false, "message": "hola" }),
            json!({ "name": "Ana", "email": "a@b.com", "message": ["hola"] }),
        ] {
            assert!(matches!(
                prepare(body, &client()),
                Err(SubmissionError::MissingFields)
            ));
        }
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        assert!(matches!(
            prepare(json!(["name"]), &client()),
            Err(SubmissionError::InvalidBody)
        ));
    }

    #[test]
    fn test_enrichment_from_client() {
        let body = json!({
            "name": "Ana",
            "email": "ana@example.com",
            "message": "Agreguen la de mi barrio",
            "city": "Mar del Plata",
            "extra": { "source": "footer" }
        });

        let submission = prepare(body, &client()).unwrap();
        assert_eq!(submission.ip_address, "198.51.100.4");
        assert_eq!(submission.user_agent, "Mozilla/5.0");
        assert_eq!(submission.city.as_deref(), Some("Mar del Plata"));
        assert!(submission.phone.is_none());
        assert_eq!(submission.payload["extra"]["source"], "footer");
        assert_eq!(submission.payload["ipAddress"], "198.51.100.4");
        assert!(
            chrono::DateTime::parse_from_rfc3339(&submission.submitted_at).is_ok()
        );
    }

    #[test]
    fn test_body_values_win_over_headers() {
        let body = json!({
            "name": "Ana",
            "email": "ana@example.com",
            "message": "hola",
            "ipAddress": "10.0.0.1",
            "userAgent": "curl/8"
        });

        let submission = prepare(body, &client()).unwrap();
        assert_eq!(submission.ip_address, "10.0.0.1");
        assert_eq!(submission.user_agent, "curl/8");
    }

    #[tokio::test]
    async fn test_submit_without_database() {
        let service = SubmissionService::new(None);
        let body = json!({ "name": "Ana", "email": "a@b.com", "message": "hola" });

        let result = service.submit(body, &ClientInfo::default()).await;
        assert!(matches!(result, Err(SubmissionError::Unavailable)));
    }

    #[tokio::test]
    async fn test_submit_persists() {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let service = SubmissionService::new(Some(store.clone()));
        let body = json!({ "name": "Ana", "email": "a@b.com", "message": "hola" });

        let id = service.submit(body, &client()).await.unwrap();
        let saved = crate::entities::prelude::Submissions::find()
            .all(&store.conn)
            .await
            .unwrap();
        assert_eq!(saved[0].id, id);
        assert_eq!(saved[0].ip_address, "198.51.100.4");
    }
}
