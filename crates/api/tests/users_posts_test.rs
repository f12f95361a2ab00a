//! Route tests for users, posts, and health.

mod common;

use common::{TestApp, body_json, create_user, empty_request, json_request};
use serde_json::json;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let response = app.send(empty_request("GET", "/health")).await;
    assert_eq!(response.status(), 200);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "up");
}

#[tokio::test]
async fn test_create_and_get_user() {
    let app = TestApp::new().await;
    let id = create_user(
        &app,
        json!({ "email": "a@example.com", "name": "Ana", "phone": "0812" }),
    )
    .await;

    let response = app.send(empty_request("GET", &format!("/users/{id}"))).await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        body_json(response).await,
        json!({
            "id_user": id,
            "email": "a@example.com",
            "name": "Ana",
            "phone": "0812",
            "profile_picture": null
        })
    );
}

#[tokio::test]
async fn test_create_user_conflicts() {
    let app = TestApp::new().await;
    let id = create_user(&app, json!({ "email": "a@example.com", "name": "Ana" })).await;

    let same_id = app
        .send(json_request(
            "POST",
            "/users",
            &json!({ "id_user": id, "email": "other@example.com", "name": "Other" }),
        ))
        .await;
    assert_eq!(same_id.status(), 409);
    assert_eq!(body_json(same_id).await["error"], "conflict");

    let same_email = app
        .send(json_request(
            "POST",
            "/users",
            &json!({ "email": "a@example.com", "name": "Again" }),
        ))
        .await;
    assert_eq!(same_email.status(), 409);
}

#[tokio::test]
async fn test_create_user_requires_email() {
    let app = TestApp::new().await;
    let response = app
        .send(json_request(
            "POST",
            "/users",
            &json!({ "email": " ", "name": "Ana" }),
        ))
        .await;
    assert_eq!(response.status(), 400);
    assert_eq!(body_json(response).await["error"], "validation_error");
}

#[tokio::test]
async fn test_get_missing_user() {
    let app = TestApp::new().await;
    let response = app.send(empty_request("GET", "/users/12")).await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_sign_in_is_idempotent() {
    let app = TestApp::new().await;
    let body = json!({ "email": "g@example.com", "name": "Gita" });

    let first = body_json(app.send(json_request("POST", "/users/signin", &body)).await).await;
    let second = body_json(app.send(json_request("POST", "/users/signin", &body)).await).await;
    assert_eq!(first["id_user"], second["id_user"]);

    let list = body_json(app.send(empty_request("GET", "/users")).await).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_user_defaults_phone() {
    let app = TestApp::new().await;
    let id = create_user(
        &app,
        json!({ "email": "u@example.com", "name": "U", "phone": "1" }),
    )
    .await;

    let response = app
        .send(json_request(
            "PUT",
            &format!("/users/{id}"),
            &json!({ "email": "u2@example.com", "name": "U2" }),
        ))
        .await;
    assert_eq!(response.status(), 200);
    let body = body_json(response).await;
    assert_eq!(body["email"], "u2@example.com");
    assert_eq!(body["phone"], "");
}

#[tokio::test]
async fn test_post_lifecycle() {
    let app = TestApp::new().await;
    let id = create_user(&app, json!({ "email": "p@example.com", "name": "P" })).await;

    let response = app
        .send(json_request(
            "POST",
            "/posts",
            &json!({ "title": "Hello", "content": "World", "id_user": id }),
        ))
        .await;
    assert_eq!(response.status(), 201);
    let created = body_json(response).await;
    assert_eq!(created["message"], "Post created successfully");
    let post_id = created["post"]["id_posts"].as_i64().unwrap();
    let created_at = created["post"]["created_at"].as_str().unwrap();
    assert_eq!(created_at.len(), "2024-01-01 00:00:00".len());

    let mine = body_json(
        app.send(empty_request("GET", &format!("/posts/user/{id}")))
            .await,
    )
    .await;
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let response = app
        .send(json_request(
            "PUT",
            &format!("/posts/{post_id}"),
            &json!({ "title": "Hi", "content": "There" }),
        ))
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(body_json(response).await["post"]["title"], "Hi");

    let response = app
        .send(empty_request("DELETE", &format!("/posts/{post_id}")))
        .await;
    assert_eq!(response.status(), 200);

    let response = app
        .send(empty_request("GET", &format!("/posts/{post_id}")))
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_post_validation_and_missing_author() {
    let app = TestApp::new().await;

    let empty = app
        .send(json_request(
            "POST",
            "/posts",
            &json!({ "title": "", "content": "x", "id_user": 1 }),
        ))
        .await;
    assert_eq!(empty.status(), 400);

    let orphan = app
        .send(json_request(
            "POST",
            "/posts",
            &json!({ "title": "t", "content": "x", "id_user": 1 }),
        ))
        .await;
    assert_eq!(orphan.status(), 404);
}

#[tokio::test]
async fn test_posts_by_user_without_posts_is_404() {
    let app = TestApp::new().await;
    let id = create_user(&app, json!({ "email": "n@example.com", "name": "N" })).await;

    let response = app
        .send(empty_request("GET", &format!("/posts/user/{id}")))
        .await;
    assert_eq!(response.status(), 404);
}
