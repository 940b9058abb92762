use validator::Validate;

use crate::{
    entities::{
        image::ImageUpload,
        option_fields::OptionField,
        project::{NewProjectRequest, Project, UpdateProjectRequest},
    },
    errors::AppError,
    media::MediaStore,
    repositories::project::ProjectRepository,
    utils::valid_uuid::valid_uuid,
};

/// Keeps a project's `image_url` in step with the media store.
///
/// - create: the image is stored before the record is inserted; a failed
///   upload leaves no record behind.
/// - update: a new image replaces the URL; the previous remote object is left
///   where it is.
/// - delete: remote cleanup is best-effort and runs before the record is
///   removed.
pub struct ProjectHandler<R, M>
where
    R: ProjectRepository,
    M: MediaStore,
{
    pub project_repo: R,
    pub media_store: M,
}

impl<R, M> ProjectHandler<R, M>
where
    R: ProjectRepository,
    M: MediaStore,
{
    pub fn new(project_repo: R, media_store: M) -> Self {
        ProjectHandler { project_repo, media_store }
    }

    /// Creates a project, uploading its image first when one is attached
    pub async fn create_project(
        &self,
        request: NewProjectRequest,
        image: Option<ImageUpload>,
    ) -> Result<Project, AppError> {
        request.validate()?;

        let image_url = self.media_store.store(image).await.map_err(|e| {
            tracing::error!(error = %e, "Image upload failed, project not created");
            AppError::from(e)
        })?;

        let insert = request.prepare_for_insert(image_url);

        let project = self.project_repo.create_project(&insert).await.inspect_err(|e| {
            if !insert.image_url.is_empty() {
                tracing::warn!(
                    image_url = %insert.image_url,
                    error = %e,
                    "Project insert failed after upload, remote image is orphaned"
                );
            }
        })?;

        tracing::info!(project_id = %project.id, has_image = project.has_image(), "Project created");
        Ok(project)
    }

    /// Lists every project, newest first
    pub async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        self.project_repo.list_projects().await
    }

    /// Retrieves a project by its ID
    pub async fn get_project_by_id(&self, id: &str) -> Result<Project, AppError> {
        let valid_id = valid_uuid(id)?;
        self.project_repo.get_project_by_id(&valid_id).await
    }

    /// Applies the provided fields; a new image replaces `image_url`, no image keeps it
    pub async fn update_project(
        &self,
        id: &str,
        request: UpdateProjectRequest,
        image: Option<ImageUpload>,
    ) -> Result<Project, AppError> {
        request.validate()?;

        let valid_id = valid_uuid(id)?;

        let current = self.project_repo.get_project_by_id(&valid_id).await?;

        let image_url = match image {
            Some(image) => {
                let url = self.media_store.upload(image).await.map_err(|e| {
                    tracing::error!(project_id = %current.id, error = %e, "Image upload failed, project not updated");
                    AppError::from(e)
                })?;
                if current.has_image() {
                    // The replaced object stays in the media store
                    tracing::debug!(
                        project_id = %current.id,
                        previous_url = %current.image_url,
                        "Project image replaced"
                    );
                }
                OptionField::SetToValue(url)
            }
            None => OptionField::Unchanged,
        };

        let changes = request.prepare_for_update(image_url);

        let updated = self.project_repo.update_project(&valid_id, &changes).await.inspect_err(|e| {
            if let Some(url) = changes.image_url.flatten_str() {
                tracing::warn!(image_url = %url, error = %e, "Project update failed after upload, remote image is orphaned");
            }
        })?;

        tracing::info!(project_id = %updated.id, revision = updated.revision, "Project updated");
        Ok(updated)
    }

    /// Deletes a project, removing its remote image first on a best-effort basis
    pub async fn delete_project(&self, id: &str) -> Result<(), AppError> {
        let valid_id = valid_uuid(id)?;

        let current = self.project_repo.get_project_by_id(&valid_id).await?;

        if current.has_image() {
            self.media_store.remove(&current.image_url).await;
        }

        self.project_repo.delete_project(&valid_id).await?;

        tracing::info!(project_id = %valid_id, "Project deleted");
        Ok(())
    }

    /// Reports whether the project store is reachable
    pub async fn check_storage(&self) -> Result<(), AppError> {
        self.project_repo.check_connection().await
    }
}
