use actix_multipart::form::MultipartForm;
use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{entities::project::ProjectUpload, errors::AppError, AppState};

#[instrument(skip(state, form))]
pub async fn create_project(
    state: web::Data<AppState>,
    form: MultipartForm<ProjectUpload>,
) -> Result<impl Responder, AppError> {
    let (request, image) = form.into_inner().into_new_project();

    let project = state.project_handler
        .create_project(request, image)
        .await?;

    Ok(HttpResponse::Created().json(project))
}

#[instrument(skip(state))]
pub async fn list_projects(
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let projects = state.project_handler.list_projects().await?;
    Ok(HttpResponse::Ok().json(projects))
}

#[instrument(skip(project_id, state))]
pub async fn get_project_by_id(
    project_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.get_project_by_id(&project_id).await?;
    Ok(HttpResponse::Ok().json(project))
}

#[instrument(skip(project_id, state, form))]
pub async fn update_project(
    project_id: web::Path<String>,
    state: web::Data<AppState>,
    form: MultipartForm<ProjectUpload>,
) -> Result<impl Responder, AppError> {
    let (request, image) = form.into_inner().into_project_update();

    let updated = state.project_handler
        .update_project(&project_id, request, image)
        .await?;

    Ok(HttpResponse::Ok().json(updated))
}

#[instrument(skip(project_id, state))]
pub async fn delete_project(
    project_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.project_handler.delete_project(&project_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Project deleted successfully"
    })))
}
