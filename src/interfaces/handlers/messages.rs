use std::collections::HashMap;

use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::{message::NewMessageForm, pagination::Pagination},
    errors::AppError,
    AppState,
};

#[instrument(skip(state, form))]
pub async fn create_message(
    state: web::Data<AppState>,
    form: web::Json<NewMessageForm>,
) -> Result<impl Responder, AppError> {
    let response = state.message_handler
        .create_message(form.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

#[instrument(skip(state, query))]
pub async fn list_messages(
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> Result<impl Responder, AppError> {
    let pagination = Pagination::from_query(&query);

    let response = state.message_handler.list_messages(pagination).await?;

    Ok(HttpResponse::Ok().json(response))
}

#[instrument(skip(message_id, state))]
pub async fn delete_message(
    message_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.message_handler.delete_message(&message_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Message deleted successfully"
    })))
}
