use crate::repositories::sqlx_repo::{SqlxMessageRepo, SqlxProjectRepo};

/// Postgres-backed repositories sharing one connection pool.
#[derive(Clone)]
pub struct SharedRepositories {
    pub project_repo: SqlxProjectRepo,
    pub message_repo: SqlxMessageRepo,
}

impl SharedRepositories {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SharedRepositories {
            project_repo: SqlxProjectRepo::new(pool.clone()),
            message_repo: SqlxMessageRepo::new(pool),
        }
    }
}
