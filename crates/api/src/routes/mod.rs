//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod health;
pub mod posts;
pub mod profile_picture;
pub mod users;

/// Creates the API router with all routes.
pub fn api_routes(state: &AppState) -> Router<AppState> {
    let max_upload = state.attachments.store().config().max_file_size;

    Router::new()
        .merge(health::routes())
        .merge(users::routes())
        .merge(posts::routes())
        .merge(profile_picture::routes(max_upload))
}
