//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST routes for users, posts, and profile pictures
//! - The JSON error envelope shared by all handlers

pub mod error;
pub mod routes;

use axum::Router;
use nagari_core::attachment::AttachmentService;
use nagari_db::UserRepository;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Profile picture service backed by the users table.
pub type ProfilePictures = AttachmentService<UserRepository>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Profile picture service; the only writer of `users.profile_picture`.
    pub attachments: Arc<ProfilePictures>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes(&state))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
