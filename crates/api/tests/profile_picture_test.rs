//! Route tests for profile picture upload, removal, and retrieval.

mod common;

use common::{
    DEFAULT_BYTES, DEFAULT_PATH, TestApp, body_bytes, body_json, create_user, empty_request,
    multipart_request,
};
use nagari_core::attachment::ReferenceRepository;
use nagari_db::UserRepository;
use nagari_shared::types::UserId;
use serde_json::json;

async fn user(app: &TestApp, email: &str) -> i64 {
    create_user(app, json!({ "email": email, "name": "Test User" })).await
}

#[tokio::test]
async fn test_upload_then_get_returns_same_bytes() {
    let app = TestApp::new().await;
    let id = user(&app, "a@example.com").await;

    let response = app
        .send(multipart_request(
            &format!("/users/{id}/profile-picture"),
            "profile_picture",
            Some("Photo.PNG"),
            b"\x89PNG\r\n\x1a\nimage",
        ))
        .await;
    assert_eq!(response.status(), 200);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Profile picture updated successfully");
    let path = body["profile_picture"].as_str().unwrap().to_string();
    assert!(path.starts_with("/userProfile/"));
    assert!(path.ends_with(".png"));

    let response = app
        .send(empty_request("GET", &format!("/users/{id}/profile-picture")))
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["content-type"], "image/png");
    assert_eq!(body_bytes(response).await, b"\x89PNG\r\n\x1a\nimage");

    let stored = app
        .send(empty_request("GET", &format!("/users/{id}")))
        .await;
    assert_eq!(body_json(stored).await["profile_picture"], path.as_str());
}

#[tokio::test]
async fn test_second_upload_removes_first_file() {
    let app = TestApp::new().await;
    let id = user(&app, "b@example.com").await;
    let uri = format!("/users/{id}/profile-picture");

    let first = body_json(
        app.send(multipart_request(&uri, "profile_picture", Some("a.jpg"), b"first"))
            .await,
    )
    .await;
    let second = body_json(
        app.send(multipart_request(&uri, "profile_picture", Some("b.jpg"), b"second"))
            .await,
    )
    .await;

    assert_ne!(first["profile_picture"], second["profile_picture"]);
    let second_name = second["profile_picture"]
        .as_str()
        .unwrap()
        .trim_start_matches("/userProfile/")
        .to_string();
    assert_eq!(app.uploaded_files(), vec![second_name]);

    let response = app.send(empty_request("GET", &uri)).await;
    assert_eq!(response.headers()["content-type"], "image/jpeg");
    assert_eq!(body_bytes(response).await, b"second");
}

#[tokio::test]
async fn test_upload_alias_route() {
    let app = TestApp::new().await;
    let id = user(&app, "c@example.com").await;

    let response = app
        .send(multipart_request(
            &format!("/users/uploadprofilepicture/{id}"),
            "profile_picture",
            Some("me.jpeg"),
            b"jpeg",
        ))
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(app.uploaded_files().len(), 1);
}

#[tokio::test]
async fn test_upload_unknown_user_is_404_and_writes_nothing() {
    let app = TestApp::new().await;

    let response = app
        .send(multipart_request(
            "/users/999/profile-picture",
            "profile_picture",
            Some("x.png"),
            b"x",
        ))
        .await;
    assert_eq!(response.status(), 404);
    assert_eq!(body_json(response).await["error"], "not_found");
    assert!(app.uploaded_files().is_empty());
}

#[tokio::test]
async fn test_oversized_body_is_413_and_writes_nothing() {
    let app = TestApp::with_max_file_size(16).await;
    let id = user(&app, "big@example.com").await;

    let response = app
        .send(multipart_request(
            &format!("/users/{id}/profile-picture"),
            "profile_picture",
            Some("big.png"),
            &vec![0u8; 200 * 1024],
        ))
        .await;

    assert_eq!(response.status(), 413);
    assert_eq!(body_json(response).await["error"], "payload_too_large");
    assert!(app.uploaded_files().is_empty());

    let stored = UserRepository::new(app.db.clone())
        .get_reference(UserId::new(id))
        .await
        .unwrap();
    assert_eq!(stored, None);
}

#[tokio::test]
async fn test_upload_without_file_part_is_rejected() {
    let app = TestApp::new().await;
    let id = user(&app, "d@example.com").await;
    let uri = format!("/users/{id}/profile-picture");

    for request in [
        multipart_request(&uri, "avatar", Some("x.png"), b"x"),
        multipart_request(&uri, "profile_picture", None, b"not a file"),
    ] {
        let response = app.send(request).await;
        assert_eq!(response.status(), 400);
        assert_eq!(body_json(response).await["error"], "missing_upload");
    }
    assert!(app.uploaded_files().is_empty());
}

#[tokio::test]
async fn test_delete_clears_and_is_idempotent() {
    let app = TestApp::new().await;
    let id = user(&app, "e@example.com").await;
    let uri = format!("/users/{id}/profile-picture");
    app.send(multipart_request(&uri, "profile_picture", Some("x.png"), b"x"))
        .await;

    for _ in 0..2 {
        let response = app.send(empty_request("DELETE", &uri)).await;
        assert_eq!(response.status(), 200);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Profile picture removed successfully");
        assert!(body["profile_picture"].is_null());
    }
    assert!(app.uploaded_files().is_empty());

    let response = app.send(empty_request("GET", &uri)).await;
    assert_eq!(response.status(), 200);
    assert_eq!(body_json(response).await, json!({ "profile_picture": null }));
}

#[tokio::test]
async fn test_default_picture_is_served_and_kept() {
    let app = TestApp::new().await;
    let id = create_user(
        &app,
        json!({
            "id_user": 42,
            "email": "f@example.com",
            "name": "Default",
            "profile_picture": DEFAULT_PATH
        }),
    )
    .await;
    assert_eq!(id, 42);
    let uri = "/users/42/profile-picture";

    let response = app.send(empty_request("GET", uri)).await;
    assert_eq!(response.headers()["content-type"], "image/png");
    assert_eq!(body_bytes(response).await, DEFAULT_BYTES);

    let response = app
        .send(multipart_request(
            uri,
            "profile_picture",
            Some("selfie.jpg"),
            b"\xff\xd8\xff\xe0",
        ))
        .await;
    assert_eq!(response.status(), 200);
    assert!(app.default_file().is_file());

    let response = app.send(empty_request("GET", uri)).await;
    assert_eq!(response.headers()["content-type"], "image/jpeg");
    assert_eq!(body_bytes(response).await, b"\xff\xd8\xff\xe0");

    // Clearing never touches the shared default either.
    app.send(empty_request("DELETE", uri)).await;
    assert!(app.default_file().is_file());
}

#[tokio::test]
async fn test_dangling_reference_is_server_error() {
    let app = TestApp::new().await;
    let id = user(&app, "g@example.com").await;
    UserRepository::new(app.db.clone())
        .set_reference(UserId::new(id), Some("/userProfile/vanished.png"))
        .await
        .unwrap();

    let response = app
        .send(empty_request("GET", &format!("/users/{id}/profile-picture")))
        .await;
    assert_eq!(response.status(), 500);
    let body = body_json(response).await;
    assert_eq!(body["error"], "storage_error");
    assert_eq!(body["message"], "An error occurred");
}

#[tokio::test]
async fn test_get_and_delete_unknown_user_is_404() {
    let app = TestApp::new().await;

    let response = app
        .send(empty_request("GET", "/users/5/profile-picture"))
        .await;
    assert_eq!(response.status(), 404);

    let response = app
        .send(empty_request("DELETE", "/users/5/profile-picture"))
        .await;
    assert_eq!(response.status(), 404);
}
