//! Shared setup for route tests: in-memory database, scratch directories.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use http_body_util::BodyExt;
use nagari_api::{AppState, create_router};
use nagari_core::attachment::{AttachmentService, ReferenceCodec};
use nagari_core::storage::{AttachmentStore, StorageConfig};
use nagari_db::migration::MigratorTrait;
use nagari_db::{Migrator, UserRepository};
use nagari_shared::DatabaseConfig;
use sea_orm::DatabaseConnection;
use tower::ServiceExt;

pub const DEFAULT_PATH: &str = "/default/profile_picture.png";
pub const DEFAULT_BYTES: &[u8] = b"default-png-bytes";
const BOUNDARY: &str = "nagari-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    pub dir: tempfile::TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_max_file_size(StorageConfig::DEFAULT_MAX_FILE_SIZE).await
    }

    /// App whose upload store rejects files larger than `max_file_size`.
    pub async fn with_max_file_size(max_file_size: u64) -> Self {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
        };
        let db = nagari_db::connect(&config).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let store = AttachmentStore::from_config(
            StorageConfig::new(dir.path().join("userProfile")).with_max_file_size(max_file_size),
        )
        .unwrap();
        store.ensure_directory().await.unwrap();
        let defaults =
            AttachmentStore::from_config(StorageConfig::new(dir.path().join("default"))).unwrap();
        defaults.ensure_directory().await.unwrap();
        std::fs::write(
            dir.path().join("default").join("profile_picture.png"),
            DEFAULT_BYTES,
        )
        .unwrap();

        let attachments = AttachmentService::new(
            Arc::new(store),
            Arc::new(UserRepository::new(db.clone())),
            ReferenceCodec::new("/userProfile", DEFAULT_PATH),
        )
        .with_default_store(Arc::new(defaults));

        let state = AppState {
            db: Arc::new(db.clone()),
            attachments: Arc::new(attachments),
        };

        Self {
            router: create_router(state),
            db,
            dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.dir.path().join("userProfile")
    }

    pub fn default_file(&self) -> PathBuf {
        self.dir.path().join("default").join("profile_picture.png")
    }

    pub fn uploaded_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.upload_dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

pub fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Multipart request with a single part.
pub fn multipart_request(
    uri: &str,
    field: &str,
    file_name: Option<&str>,
    data: &[u8],
) -> Request<Body> {
    let disposition = match file_name {
        Some(name) => format!("form-data; name=\"{field}\"; filename=\"{name}\""),
        None => format!("form-data; name=\"{field}\""),
    };

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(format!("Content-Disposition: {disposition}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("PUT")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Creates a user through the API and returns its id.
pub async fn create_user(app: &TestApp, body: serde_json::Value) -> i64 {
    let response = app.send(json_request("POST", "/users", &body)).await;
    assert_eq!(response.status(), 201);
    body_json(response).await["id_user"].as_i64().unwrap()
}
