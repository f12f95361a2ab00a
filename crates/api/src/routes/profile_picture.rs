//! Profile picture routes.
//!
//! Uploads are streamed straight from the multipart field into the store;
//! the request body is never buffered whole.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State, multipart::MultipartError},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::put,
};
use serde_json::json;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{debug, info};

use crate::{AppState, error::ApiError};
use nagari_shared::types::UserId;

/// Multipart field carrying the picture.
pub const UPLOAD_FIELD: &str = "profile_picture";

/// Room for multipart framing on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Creates the profile picture routes.
///
/// Bodies larger than `max_upload` plus framing are rejected before any
/// byte reaches the store.
pub fn routes(max_upload: u64) -> Router<AppState> {
    let limit = usize::try_from(max_upload)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .route(
            "/users/{id_user}/profile-picture",
            put(upload_profile_picture)
                .delete(remove_profile_picture)
                .get(get_profile_picture),
        )
        .route(
            "/users/uploadprofilepicture/{id_user}",
            put(upload_profile_picture),
        )
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(limit))
}

/// PUT `/users/{id_user}/profile-picture` - Replace the picture with an upload.
async fn upload_profile_picture(
    State(state): State<AppState>,
    Path(id_user): Path<UserId>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    // Reject unknown users before reading any of the body.
    if !state.attachments.owner_exists(id_user).await? {
        return Err(ApiError::new(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("User {id_user} not found"),
        ));
    }

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let Some(original_name) = field.file_name().map(str::to_string) else {
            debug!(user_id = %id_user, "Upload field without a file part skipped");
            continue;
        };

        let path = state
            .attachments
            .replace(id_user, field, &original_name)
            .await?;

        info!(user_id = %id_user, path = %path, "Profile picture uploaded");
        return Ok(Json(json!({
            "message": "Profile picture updated successfully",
            "profile_picture": path
        }))
        .into_response());
    }

    Err(ApiError::bad_request(
        "missing_upload",
        format!("Multipart field '{UPLOAD_FIELD}' with a file is required"),
    ))
}

/// A body cut off by the size limit is a 413, anything else malformed a 400.
fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            "payload_too_large",
            e.body_text(),
        )
    } else {
        ApiError::bad_request("invalid_multipart", e.body_text())
    }
}

/// DELETE `/users/{id_user}/profile-picture` - Clear the picture.
async fn remove_profile_picture(
    State(state): State<AppState>,
    Path(id_user): Path<UserId>,
) -> Result<Response, ApiError> {
    state.attachments.clear(id_user).await?;

    Ok(Json(json!({
        "message": "Profile picture removed successfully",
        "profile_picture": null
    }))
    .into_response())
}

/// GET `/users/{id_user}/profile-picture` - Picture bytes, or `null` when unset.
async fn get_profile_picture(
    State(state): State<AppState>,
    Path(id_user): Path<UserId>,
) -> Result<Response, ApiError> {
    match state.attachments.read(id_user).await? {
        Some(content) => Ok((
            [(header::CONTENT_TYPE, content.content_type)],
            content.bytes,
        )
            .into_response()),
        None => Ok(Json(json!({ "profile_picture": null })).into_response()),
    }
}
