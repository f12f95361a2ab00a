//! Forum post routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{AppState, error::ApiError};
use nagari_db::PostRepository;
use nagari_db::entities::posts;
use nagari_db::repositories::{CreatePostInput, UpdatePostInput};
use nagari_shared::types::{PostId, UserId};

/// Timestamp layout of `created_at` in responses.
const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Creates the post routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/{id_post}",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/posts/user/{id_user}", get(list_user_posts))
}

/// Request body for creating a post.
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
    /// Author.
    pub id_user: UserId,
}

/// Request body for updating a post.
#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    /// New title.
    pub title: String,
    /// New body.
    pub content: String,
}

/// Response for a post.
#[derive(Debug, Serialize)]
pub struct PostResponse {
    /// Post ID.
    pub id_posts: i64,
    /// Title.
    pub title: String,
    /// Body.
    pub content: String,
    /// Author.
    pub id_user: i64,
    /// Creation time as `YYYY-MM-DD HH:MM:SS`.
    pub created_at: String,
}

impl From<posts::Model> for PostResponse {
    fn from(model: posts::Model) -> Self {
        Self {
            id_posts: model.id_posts,
            title: model.title,
            content: model.content,
            id_user: model.id_user,
            created_at: model.created_at.format(CREATED_AT_FORMAT).to_string(),
        }
    }
}

fn validate(title: &str, content: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() || content.trim().is_empty() {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "Title and content are required",
        ));
    }
    Ok(())
}

fn post_not_found(id: PostId) -> ApiError {
    ApiError::new(
        StatusCode::NOT_FOUND,
        "not_found",
        format!("Post {id} not found"),
    )
}

/// POST `/posts` - Create a post.
async fn create_post(
    State(state): State<AppState>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate(&payload.title, &payload.content)?;

    let repo = PostRepository::new((*state.db).clone());
    let post = repo
        .create(CreatePostInput {
            title: payload.title,
            content: payload.content,
            id_user: payload.id_user,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Post created successfully",
            "post": PostResponse::from(post)
        })),
    ))
}

/// GET `/posts` - List all posts.
async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let repo = PostRepository::new((*state.db).clone());
    let posts = repo.list().await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

/// GET `/posts/{id_post}` - Get one post.
async fn get_post(
    State(state): State<AppState>,
    Path(id_post): Path<PostId>,
) -> Result<Json<PostResponse>, ApiError> {
    let repo = PostRepository::new((*state.db).clone());
    let post = repo
        .find_by_id(id_post)
        .await?
        .ok_or_else(|| post_not_found(id_post))?;
    Ok(Json(post.into()))
}

/// GET `/posts/user/{id_user}` - List a user's posts. 404 when there are none.
async fn list_user_posts(
    State(state): State<AppState>,
    Path(id_user): Path<UserId>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let repo = PostRepository::new((*state.db).clone());
    let posts = repo.list_by_user(id_user).await?;
    if posts.is_empty() {
        return Err(ApiError::new(
            StatusCode::NOT_FOUND,
            "not_found",
            "No posts found for this user",
        ));
    }
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

/// PUT `/posts/{id_post}` - Update title and content.
async fn update_post(
    State(state): State<AppState>,
    Path(id_post): Path<PostId>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate(&payload.title, &payload.content)?;

    let repo = PostRepository::new((*state.db).clone());
    let post = repo
        .update(
            id_post,
            UpdatePostInput {
                title: payload.title,
                content: payload.content,
            },
        )
        .await?;

    Ok(Json(json!({
        "message": "Post updated successfully",
        "post": PostResponse::from(post)
    })))
}

/// DELETE `/posts/{id_post}` - Delete a post.
async fn delete_post(
    State(state): State<AppState>,
    Path(id_post): Path<PostId>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = PostRepository::new((*state.db).clone());
    repo.delete(id_post).await?;
    Ok(Json(json!({ "message": "Post deleted successfully" })))
}
