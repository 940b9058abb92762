use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::entities::pagination::Pagination;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct NewMessageForm {
    #[validate(
        length(min = 1, max = 100, message = "Name is required"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    #[validate(email(message = "A valid email is required"))]
    pub email: String,

    #[validate(
        length(min = 1, max = 5000, message = "Message is required"),
        custom(function = "validate_not_blank")
    )]
    pub message: String,
}

#[derive(Debug)]
pub struct MessageInsert {
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageSentResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageListResponse {
    pub success: bool,
    pub messages: Vec<Message>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

/// Whitespace-only input is stored trimmed, so it counts as missing.
fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("This field cannot be blank".into());
        return Err(err);
    }
    Ok(())
}

impl NewMessageForm {
    pub fn prepare_for_insert(&self) -> MessageInsert {
        MessageInsert {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            message: self.message.trim().to_string(),
            created_at: Utc::now(),
        }
    }
}

impl MessageListResponse {
    pub fn new(messages: Vec<Message>, total: i64, pagination: Pagination) -> Self {
        MessageListResponse {
            success: true,
            messages,
            total,
            page: pagination.page,
            limit: pagination.limit,
            total_pages: pagination.total_pages(total),
        }
    }
}
