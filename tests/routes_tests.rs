
use actix_web::{http::{header, StatusCode}, test, web, App};
use portfolio_api::{routes::configure_routes, web::multipart_config};
use serde_json::{json, Value};
use test_utils::*;

macro_rules! spawn_app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($ctx.state))
                .app_data(multipart_config(&test_config()))
                .configure(configure_routes),
        )
        .await
    };
}

fn multipart_request(
    method: actix_web::http::Method,
    uri: &str,
    fields: &[(&str, &str)],
    image: Option<(&str, &str, &[u8])>,
) -> test::TestRequest {
    test::TestRequest::default()
        .method(method)
        .uri(uri)
        .insert_header((header::CONTENT_TYPE, multipart_content_type()))
        .set_payload(multipart_body(fields, image))
}

#[actix_rt::test]
async fn create_project_with_image_returns_201() {
    let ctx = TestContext::new();
    let media = ctx.media.clone();
    let app = spawn_app!(ctx);

    let req = multipart_request(
        actix_web::http::Method::POST,
        "/api/projects",
        &[
            ("title", "Store"),
            ("description", "Online shop"),
            ("liveLink", "https://store.example.com"),
            ("technologies", "React, Node.js"),
            ("year", "2024"),
        ],
        Some(("cover.png", "image/png", PNG_BYTES)),
    )
    .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "Store");
    assert_eq!(body["liveLink"], "https://store.example.com");
    assert_eq!(body["technologies"], json!(["React", "Node.js"]));
    assert!(body["_id"].is_string());
    assert!(body["imageUrl"].as_str().unwrap().starts_with("https://res.cloudinary.com/"));
    assert!(body["createdAt"].is_string());
    assert_eq!(media.upload_count(), 1);
}

#[actix_rt::test]
async fn create_project_without_image_has_empty_url() {
    let ctx = TestContext::new();
    let media = ctx.media.clone();
    let app = spawn_app!(ctx);

    let req = multipart_request(
        actix_web::http::Method::POST,
        "/api/projects",
        &[("title", "Plain")],
        None,
    )
    .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["imageUrl"], "");
    assert_eq!(body["technologies"], json!([]));
    assert_eq!(media.upload_count(), 0);
}

#[actix_rt::test]
async fn create_project_without_title_is_rejected() {
    let ctx = TestContext::new();
    let projects = ctx.projects.clone();
    let media = ctx.media.clone();
    let app = spawn_app!(ctx);

    let req = multipart_request(
        actix_web::http::Method::POST,
        "/api/projects",
        &[("description", "No title here")],
        Some(("cover.png", "image/png", PNG_BYTES)),
    )
    .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(body["details"][0]["field"], "title");
    assert_eq!(projects.len(), 0);
    assert_eq!(media.upload_count(), 0);
}

#[actix_rt::test]
async fn failed_upload_returns_500_and_creates_nothing() {
    let ctx = TestContext::new();
    ctx.media.fail_uploads(true);
    let app = spawn_app!(ctx);

    let req = multipart_request(
        actix_web::http::Method::POST,
        "/api/projects",
        &[("title", "Store")],
        Some(("cover.png", "image/png", PNG_BYTES)),
    )
    .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let list = test::TestRequest::get().uri("/api/projects").to_request();
    let body: Value = test::call_and_read_body_json(&app, list).await;
    assert_eq!(body, json!([]));
}

#[actix_rt::test]
async fn list_projects_is_newest_first() {
    let ctx = TestContext::new();
    let app = spawn_app!(ctx);

    for title in ["A", "B", "C"] {
        let req = multipart_request(
            actix_web::http::Method::POST,
            "/api/projects",
            &[("title", title)],
            None,
        )
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get().uri("/api/projects").to_request();
    let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;

    let titles: Vec<&str> = body.iter().map(|p| p["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["C", "B", "A"]);
}

#[actix_rt::test]
async fn update_project_keeps_image_unless_replaced() {
    let ctx = TestContext::new();
    let existing = sample_project("Old", "https://res.cloudinary.com/demo/image/upload/v1/projects/old.png");
    let id = existing.id;
    ctx.projects.seed(existing);
    let media = ctx.media.clone();
    let app = spawn_app!(ctx);

    let req = multipart_request(
        actix_web::http::Method::PUT,
        &format!("/api/projects/{}", id),
        &[("title", "New"), ("description", "")],
        None,
    )
    .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "New");
    assert_eq!(body["description"], "");
    assert_eq!(body["github"], "https://github.com/example/repo");
    assert_eq!(body["imageUrl"], "https://res.cloudinary.com/demo/image/upload/v1/projects/old.png");

    let req = multipart_request(
        actix_web::http::Method::PUT,
        &format!("/api/projects/{}", id),
        &[],
        Some(("new.gif", "image/gif", GIF_BYTES)),
    )
    .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "New");
    assert_eq!(body["imageUrl"], "https://res.cloudinary.com/demo/image/upload/v1/projects/image-1.png");
    assert!(media.destroyed_urls().is_empty());
}

#[actix_rt::test]
async fn stale_revision_returns_409() {
    let ctx = TestContext::new();
    let existing = sample_project("Project", "");
    let id = existing.id;
    ctx.projects.seed(existing);
    let app = spawn_app!(ctx);

    for (expected_status, year) in [(StatusCode::OK, "2026"), (StatusCode::CONFLICT, "2027")] {
        let req = multipart_request(
            actix_web::http::Method::PUT,
            &format!("/api/projects/{}", id),
            &[("year", year), ("expectedRevision", "0")],
            None,
        )
        .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected_status);
    }
}

#[actix_rt::test]
async fn delete_project_then_get_is_404() {
    let ctx = TestContext::new();
    let existing = sample_project("Doomed", "https://res.cloudinary.com/demo/image/upload/v1/projects/doomed.png");
    let id = existing.id;
    ctx.projects.seed(existing);
    ctx.media.fail_destroys(true);
    let media = ctx.media.clone();
    let app = spawn_app!(ctx);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/projects/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Project deleted successfully");
    assert_eq!(
        media.destroyed_urls(),
        vec!["https://res.cloudinary.com/demo/image/upload/v1/projects/doomed.png"]
    );

    let req = test::TestRequest::get()
        .uri(&format!("/api/projects/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/projects/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn malformed_ids_return_400() {
    let ctx = TestContext::new();
    let app = spawn_app!(ctx);

    let req = test::TestRequest::get().uri("/api/projects/not-a-uuid").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::delete().uri("/api/messages/123").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn message_lifecycle() {
    let ctx = TestContext::new();
    let messages = ctx.messages.clone();
    let app = spawn_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/messages")
        .set_json(json!({
            "name": "Ada",
            "email": "Ada@Example.com",
            "message": "Hello there"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"success": true, "message": "Message sent successfully"}));

    let req = test::TestRequest::get().uri("/api/messages").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["total"], 1);
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 10);
    assert_eq!(body["totalPages"], 1);
    assert_eq!(body["messages"][0]["email"], "ada@example.com");

    let id = messages.first_id().unwrap();
    let req = test::TestRequest::delete()
        .uri(&format!("/api/messages/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(messages.len(), 0);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/messages/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn messages_are_paginated() {
    let ctx = TestContext::new();
    let app = spawn_app!(ctx);

    for i in 0..5 {
        let req = test::TestRequest::post()
            .uri("/api/contact")
            .set_json(json!({
                "name": format!("Sender {}", i),
                "email": "sender@example.com",
                "message": "Hi"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get().uri("/api/messages?page=2&limit=2").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["total"], 5);
    assert_eq!(body["page"], 2);
    assert_eq!(body["limit"], 2);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["messages"].as_array().unwrap().len(), 2);
    assert_eq!(body["messages"][0]["name"], "Sender 2");
}

#[actix_rt::test]
async fn invalid_message_is_rejected() {
    let ctx = TestContext::new();
    let messages = ctx.messages.clone();
    let app = spawn_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/messages")
        .set_json(json!({"name": "", "email": "not-an-email", "message": "Hi"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    let mut fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    fields.dedup();
    assert_eq!(fields, vec!["email", "name"]);
    assert_eq!(messages.len(), 0);
}

#[actix_rt::test]
async fn malformed_json_uses_error_envelope() {
    let ctx = TestContext::new();
    let app = spawn_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/messages")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().starts_with("Invalid input"));
}

#[actix_rt::test]
async fn health_and_home_respond() {
    let ctx = TestContext::new();
    let app = spawn_app!(ctx);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "OK");

    let req = test::TestRequest::get().uri("/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "Ok");
}

#[actix_rt::test]
async fn image_text_field_is_not_an_upload() {
    let ctx = TestContext::new();
    let existing = sample_project("Kept", "https://res.cloudinary.com/demo/image/upload/v1/projects/kept.png");
    let id = existing.id;
    ctx.projects.seed(existing);
    let media = ctx.media.clone();
    let app = spawn_app!(ctx);

    // An unset file input serialised by the site's form
    let req = multipart_request(
        actix_web::http::Method::POST,
        "/api/projects",
        &[("title", "Plain"), ("image", "null")],
        None,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["imageUrl"], "");

    let req = multipart_request(
        actix_web::http::Method::PUT,
        &format!("/api/projects/{}", id),
        &[("title", "Still kept"), ("image", "null")],
        None,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["imageUrl"], "https://res.cloudinary.com/demo/image/upload/v1/projects/kept.png");
    assert_eq!(media.upload_count(), 0);
}

#[actix_rt::test]
async fn blank_message_fields_are_rejected() {
    let ctx = TestContext::new();
    let messages = ctx.messages.clone();
    let app = spawn_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/messages")
        .set_json(json!({"name": "   ", "email": "a@example.com", "message": "  "}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["message", "name"]);
    assert_eq!(messages.len(), 0);
}

#[actix_rt::test]
async fn contact_alias_lists_messages() {
    let ctx = TestContext::new();
    let app = spawn_app!(ctx);

    for name in ["First", "Second"] {
        let req = test::TestRequest::post()
            .uri("/api/contact")
            .set_json(json!({"name": name, "email": "x@example.com", "message": "Hello"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get().uri("/api/contact").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["total"], 2);
    assert_eq!(body["messages"][0]["name"], "Second");
    assert_eq!(body["messages"][1]["name"], "First");
}
