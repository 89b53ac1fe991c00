use crate::entities::{prelude::*, submissions};
use anyhow::Result;
use sea_orm::{DatabaseConnection, EntityTrait, Set};

/// A contact-form submission ready to persist.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub ip_address: String,
    pub user_agent: String,
    pub payload: serde_json::Value,
    pub submitted_at: String,
}

pub struct SubmissionRepository {
    conn: DatabaseConnection,
}

impl SubmissionRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add(&self, submission: NewSubmission) -> Result<i32> {
        let active_model = submissions::ActiveModel {
            name: Set(submission.name),
            email: Set(submission.email),
            message: Set(submission.message),
            phone: Set(submission.phone),
            city: Set(submission.city),
            ip_address: Set(submission.ip_address),
            user_agent: Set(submission.user_agent),
            payload: Set(serde_json::to_string(&submission.payload)?),
            submitted_at: Set(submission.submitted_at),
            ..Default::default()
        };

        let result = Submissions::insert(active_model).exec(&self.conn).await?;
        Ok(result.last_insert_id)
    }
}
