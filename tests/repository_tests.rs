use chrono::Utc;
use portfolio_api::{
    db::postgres::{create_pool, run_migrations},
    entities::{
        message::NewMessageForm,
        option_fields::OptionField,
        project::{NewProjectRequest, ProjectChanges, ProjectInsert},
    },
    errors::AppError,
    repositories::{
        message::MessageRepository,
        project::ProjectRepository,
        sqlx_repo::{SqlxMessageRepo, SqlxProjectRepo},
    },
};
use sqlx::PgPool;
use uuid::Uuid;

// These run against a real Postgres and are skipped when DATABASE_URL is unset.
// Each test only inspects rows it inserted, so they can share one database.
async fn test_pool() -> Option<PgPool> {
    dotenv::dotenv().ok();

    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) if !url.trim().is_empty() => url,
        _ => {
            eprintln!("DATABASE_URL not set, skipping Postgres repository test");
            return None;
        }
    };

    let pool = create_pool(&database_url)
        .await
        .expect("Failed to create test DB pool");

    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    Some(pool)
}

fn insert(title: &str) -> ProjectInsert {
    NewProjectRequest {
        title: title.to_string(),
        description: Some("Original description".to_string()),
        github: Some("https://github.com/example/repo".to_string()),
        technologies: Some("Rust, Postgres".to_string()),
        year: Some("2025".to_string()),
        ..Default::default()
    }
    .prepare_for_insert("https://res.cloudinary.com/demo/image/upload/v1/projects/a.png".into())
}

#[actix_rt::test]
async fn insert_and_find_round_trip() {
    let Some(pool) = test_pool().await else { return };
    let repo = SqlxProjectRepo::new(pool);

    let created = repo.create_project(&insert("Stored")).await.unwrap();
    let found = repo.get_project_by_id(&created.id).await.unwrap();

    assert_eq!(found.title, "Stored");
    assert_eq!(found.technologies, vec!["Rust", "Postgres"]);
    assert_eq!(found.revision, 0);
    assert_eq!(found.live_link, None);
}

#[actix_rt::test]
async fn partial_update_keeps_absent_and_applies_empty() {
    let Some(pool) = test_pool().await else { return };
    let repo = SqlxProjectRepo::new(pool);
    let created = repo.create_project(&insert("Partial")).await.unwrap();

    let changes = ProjectChanges {
        description: OptionField::SetToValue(String::new()),
        technologies: OptionField::SetToValue(Vec::new()),
        ..Default::default()
    };
    let updated = repo.update_project(&created.id, &changes).await.unwrap();

    assert_eq!(updated.description.as_deref(), Some(""));
    assert!(updated.technologies.is_empty());
    assert_eq!(updated.title, "Partial");
    assert_eq!(updated.github.as_deref(), Some("https://github.com/example/repo"));
    assert_eq!(updated.image_url, created.image_url);
    assert_eq!(updated.revision, 1);
}

#[actix_rt::test]
async fn stale_revision_conflicts_and_unknown_id_is_not_found() {
    let Some(pool) = test_pool().await else { return };
    let repo = SqlxProjectRepo::new(pool);
    let created = repo.create_project(&insert("Guarded")).await.unwrap();

    let first = ProjectChanges {
        year: OptionField::SetToValue("2026".to_string()),
        expected_revision: Some(0),
        ..Default::default()
    };
    repo.update_project(&created.id, &first).await.unwrap();

    let stale = ProjectChanges {
        year: OptionField::SetToValue("2027".to_string()),
        expected_revision: Some(0),
        ..Default::default()
    };
    let result = repo.update_project(&created.id, &stale).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    let stored = repo.get_project_by_id(&created.id).await.unwrap();
    assert_eq!(stored.year.as_deref(), Some("2026"));
    assert_eq!(stored.revision, 1);

    let missing = Uuid::new_v4();
    assert!(matches!(
        repo.update_project(&missing, &stale).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        repo.update_project(&missing, &ProjectChanges::default()).await,
        Err(AppError::NotFound(_))
    ));
}

#[actix_rt::test]
async fn list_is_newest_first_with_insert_order_on_ties() {
    let Some(pool) = test_pool().await else { return };
    let repo = SqlxProjectRepo::new(pool);

    let same_instant = Utc::now();
    let mut ids = Vec::new();
    for title in ["A", "B", "C"] {
        let mut project = insert(title);
        project.created_at = same_instant;
        project.updated_at = same_instant;
        ids.push(repo.create_project(&project).await.unwrap().id);
    }

    let listed: Vec<Uuid> = repo.list_projects()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .filter(|id| ids.contains(id))
        .collect();

    assert_eq!(listed, vec![ids[2], ids[1], ids[0]]);
}

#[actix_rt::test]
async fn delete_removes_row_once() {
    let Some(pool) = test_pool().await else { return };
    let repo = SqlxProjectRepo::new(pool);
    let created = repo.create_project(&insert("Doomed")).await.unwrap();

    repo.delete_project(&created.id).await.unwrap();

    assert!(matches!(
        repo.get_project_by_id(&created.id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        repo.delete_project(&created.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[actix_rt::test]
async fn message_insert_and_delete() {
    let Some(pool) = test_pool().await else { return };
    let repo = SqlxMessageRepo::new(pool);

    let form = NewMessageForm {
        name: " Ada ".to_string(),
        email: "Ada@Example.com".to_string(),
        message: "Hello".to_string(),
    };
    let saved = repo.create_message(&form.prepare_for_insert()).await.unwrap();

    assert_eq!(saved.name, "Ada");
    assert_eq!(saved.email, "ada@example.com");
    assert!(repo.count_messages().await.unwrap() >= 1);

    repo.delete_message(&saved.id).await.unwrap();
    assert!(matches!(
        repo.delete_message(&saved.id).await,
        Err(AppError::NotFound(_))
    ));
}
