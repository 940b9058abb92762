use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod shared_repos;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, routes};
pub use infrastructure::{db, media, utils, web};

use errors::MediaError;
use media::{cloudinary::CloudinaryStore, MediaStore};
use repositories::{message::MessageRepository, project::ProjectRepository};
use settings::{AppConfig, MediaConfig};
use shared_repos::SharedRepositories;
use use_cases::{message::MessageHandler, project::ProjectHandler};

pub struct AppState {
    pub project_handler: AppProjectHandler,
    pub message_handler: AppMessageHandler,
}

pub type AppProjectHandler = ProjectHandler<Arc<dyn ProjectRepository>, Arc<dyn MediaStore>>;
pub type AppMessageHandler = MessageHandler<Arc<dyn MessageRepository>>;

impl AppState {
    /// Wires the Postgres repositories and the Cloudinary media store.
    pub fn new(config: &AppConfig, pool: sqlx::PgPool) -> Result<Self, MediaError> {
        let repos = SharedRepositories::new(pool);
        let media_store = CloudinaryStore::new(MediaConfig::from(config))?;

        Ok(AppState::with_components(
            Arc::new(repos.project_repo),
            Arc::new(media_store),
            Arc::new(repos.message_repo),
        ))
    }

    pub fn with_components(
        project_repo: Arc<dyn ProjectRepository>,
        media_store: Arc<dyn MediaStore>,
        message_repo: Arc<dyn MessageRepository>,
    ) -> Self {
        AppState {
            project_handler: ProjectHandler::new(project_repo, media_store),
            message_handler: MessageHandler::new(message_repo),
        }
    }
}
