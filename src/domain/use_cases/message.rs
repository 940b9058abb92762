use crate::{
    entities::{
        message::{MessageListResponse, MessageSentResponse, NewMessageForm},
        pagination::Pagination,
    },
    errors::AppError,
    repositories::message::MessageRepository,
    utils::valid_uuid::valid_uuid,
};
use validator::Validate;

pub struct MessageHandler<R>
where
    R: MessageRepository,
{
    pub message_repo: R,
}

impl<R> MessageHandler<R>
where
    R: MessageRepository,
{
    pub fn new(message_repo: R) -> Self {
        MessageHandler { message_repo }
    }

    /// Stores a contact-form submission
    pub async fn create_message(
        &self,
        request: NewMessageForm
    ) -> Result<MessageSentResponse, AppError> {
        request.validate()?;

        let new_msg = request.prepare_for_insert();

        let saved = self.message_repo.create_message(&new_msg).await?;
        tracing::info!(message_id = %saved.id, "Contact message received");

        Ok(MessageSentResponse {
            success: true,
            message: "Message sent successfully".to_string(),
        })
    }

    /// Lists one page of messages, newest first
    pub async fn list_messages(&self, pagination: Pagination) -> Result<MessageListResponse, AppError> {
        let messages = self.message_repo.list_messages(pagination).await?;
        let total = self.message_repo.count_messages().await?;

        Ok(MessageListResponse::new(messages, total, pagination))
    }

    pub async fn delete_message(&self, id: &str) -> Result<(), AppError> {
        let valid_id = valid_uuid(id)?;

        self.message_repo.delete_message(&valid_id).await?;
        tracing::info!(message_id = %valid_id, "Message deleted");

        Ok(())
    }
}
