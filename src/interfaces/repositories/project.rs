use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::project::{Project, ProjectChanges, ProjectInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxProjectRepo,
};

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;
    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError>;
    /// Newest first.
    async fn list_projects(&self) -> Result<Vec<Project>, AppError>;
    async fn get_project_by_id(&self, id: &Uuid) -> Result<Project, AppError>;
    async fn update_project(&self, id: &Uuid, changes: &ProjectChanges) -> Result<Project, AppError>;
    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError>;
}

#[async_trait]
impl<T: ProjectRepository + ?Sized> ProjectRepository for Arc<T> {
    async fn check_connection(&self) -> Result<(), AppError> {
        (**self).check_connection().await
    }

    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError> {
        (**self).create_project(project).await
    }

    async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        (**self).list_projects().await
    }

    async fn get_project_by_id(&self, id: &Uuid) -> Result<Project, AppError> {
        (**self).get_project_by_id(id).await
    }

    async fn update_project(&self, id: &Uuid, changes: &ProjectChanges) -> Result<Project, AppError> {
        (**self).update_project(id, changes).await
    }

    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError> {
        (**self).delete_project(id).await
    }
}

impl SqlxProjectRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxProjectRepo { pool }
    }

    async fn project_exists(&self, id: &Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM projects WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError> {
        let created = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (
                title, description, live_link, github, category,
                technologies, year, image_url, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#
        )
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.live_link)
        .bind(&project.github)
        .bind(&project.category)
        .bind(&project.technologies)
        .bind(&project.year)
        .bind(&project.image_url)
        .bind(project.created_at)
        .bind(project.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        let projects = sqlx::query_as::<_, Project>(
            "SELECT * FROM projects ORDER BY created_at DESC, seq DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn get_project_by_id(&self, id: &Uuid) -> Result<Project, AppError> {
        sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".into()))
    }

    async fn update_project(&self, id: &Uuid, changes: &ProjectChanges) -> Result<Project, AppError> {
        // COALESCE keeps the stored value for every column left Unchanged
        let updated = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                live_link = COALESCE($3, live_link),
                github = COALESCE($4, github),
                category = COALESCE($5, category),
                technologies = COALESCE($6, technologies),
                year = COALESCE($7, year),
                image_url = COALESCE($8, image_url),
                revision = revision + 1,
                updated_at = NOW()
            WHERE id = $9 AND ($10::INT4 IS NULL OR revision = $10)
            RETURNING *
            "#
        )
        .bind(changes.title.flatten_str())
        .bind(changes.description.flatten_str())
        .bind(changes.live_link.flatten_str())
        .bind(changes.github.flatten_str())
        .bind(changes.category.flatten_str())
        .bind(changes.technologies.flatten_slice())
        .bind(changes.year.flatten_str())
        .bind(changes.image_url.flatten_str())
        .bind(id)
        .bind(changes.expected_revision)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(project) => Ok(project),
            None if changes.expected_revision.is_some() && self.project_exists(id).await? => {
                Err(AppError::Conflict("Project was modified by another request".into()))
            }
            None => Err(AppError::NotFound("Project not found".into())),
        }
    }

    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Project not found".into()));
        }

        Ok(())
    }
}
