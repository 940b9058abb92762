use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    entities::{message::{Message, MessageInsert}, pagination::Pagination},
    errors::AppError,
    repositories::sqlx_repo::SqlxMessageRepo,
};

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create_message(&self, msg: &MessageInsert) -> Result<Message, AppError>;
    async fn list_messages(&self, pagination: Pagination) -> Result<Vec<Message>, AppError>;
    async fn count_messages(&self) -> Result<i64, AppError>;
    async fn delete_message(&self, id: &Uuid) -> Result<(), AppError>;
}

#[async_trait]
impl<T: MessageRepository + ?Sized> MessageRepository for Arc<T> {
    async fn create_message(&self, msg: &MessageInsert) -> Result<Message, AppError> {
        (**self).create_message(msg).await
    }

    async fn list_messages(&self, pagination: Pagination) -> Result<Vec<Message>, AppError> {
        (**self).list_messages(pagination).await
    }

    async fn count_messages(&self) -> Result<i64, AppError> {
        (**self).count_messages().await
    }

    async fn delete_message(&self, id: &Uuid) -> Result<(), AppError> {
        (**self).delete_message(id).await
    }
}

impl SqlxMessageRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxMessageRepo { pool }
    }
}

#[async_trait]
impl MessageRepository for SqlxMessageRepo {
    async fn create_message(&self, msg: &MessageInsert) -> Result<Message, AppError> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (name, email, message, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#
        )
        .bind(&msg.name)
        .bind(&msg.email)
        .bind(&msg.message)
        .bind(msg.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }

    async fn list_messages(&self, pagination: Pagination) -> Result<Vec<Message>, AppError> {
        let messages = sqlx::query_as::<_, Message>(
            "SELECT * FROM messages ORDER BY created_at DESC, seq DESC LIMIT $1 OFFSET $2"
        )
        .bind(pagination.limit as i64)
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    async fn count_messages(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn delete_message(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Message not found".into()));
        }

        Ok(())
    }
}
