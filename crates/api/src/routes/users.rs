//! User routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppState, error::ApiError};
use nagari_db::UserRepository;
use nagari_db::entities::users;
use nagari_db::repositories::{CreateUserInput, UpdateUserInput};
use nagari_shared::types::UserId;

/// Creates the user routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user).get(list_users))
        .route("/users/signin", post(sign_in))
        .route("/users/{id_user}", get(get_user).put(update_user))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a user.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// Explicit key, assigned by the database when omitted.
    #[serde(default)]
    pub id_user: Option<UserId>,
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Initial picture reference.
    #[serde(default)]
    pub profile_picture: Option<String>,
}

/// Request body for signing in.
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    /// Email address.
    pub email: String,
    /// Display name used if the user is new.
    pub name: String,
}

/// Request body for updating a user.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    /// New email address.
    pub email: String,
    /// New display name.
    pub name: String,
    /// New phone number.
    #[serde(default)]
    pub phone: Option<String>,
}

/// Response for a user.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID.
    pub id_user: i64,
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Stored picture reference, `null` when unset.
    pub profile_picture: Option<String>,
}

impl From<users::Model> for UserResponse {
    fn from(model: users::Model) -> Self {
        Self {
            id_user: model.id_user,
            email: model.email,
            name: model.name,
            phone: model.phone,
            profile_picture: model.profile_picture.filter(|p| !p.is_empty()),
        }
    }
}

fn require(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "validation_error",
            format!("{field} is required"),
        ));
    }
    Ok(())
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/users` - Create a user.
async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require("email", &payload.email)?;
    require("name", &payload.name)?;

    let repo = UserRepository::new((*state.db).clone());
    let user = repo
        .create(CreateUserInput {
            id_user: payload.id_user,
            email: payload.email,
            name: payload.name,
            phone: payload.phone,
            profile_picture: payload.profile_picture,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// POST `/users/signin` - Return the user for an email, registering it if new.
async fn sign_in(
    State(state): State<AppState>,
    Json(payload): Json<SignInRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    require("email", &payload.email)?;

    let repo = UserRepository::new((*state.db).clone());
    let user = repo.sign_in(&payload.email, &payload.name).await?;

    info!(user_id = user.id_user, "User signed in");
    Ok(Json(user.into()))
}

/// GET `/users` - List users.
async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let repo = UserRepository::new((*state.db).clone());
    let users = repo.list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET `/users/{id_user}` - Get one user.
async fn get_user(
    State(state): State<AppState>,
    Path(id_user): Path<UserId>,
) -> Result<Json<UserResponse>, ApiError> {
    let repo = UserRepository::new((*state.db).clone());
    let user = repo.find_by_id(id_user).await?.ok_or_else(|| {
        ApiError::new(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("User {id_user} not found"),
        )
    })?;
    Ok(Json(user.into()))
}

/// PUT `/users/{id_user}` - Update profile fields. The picture has its own routes.
async fn update_user(
    State(state): State<AppState>,
    Path(id_user): Path<UserId>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    require("email", &payload.email)?;
    require("name", &payload.name)?;

    let repo = UserRepository::new((*state.db).clone());
    let user = repo
        .update(
            id_user,
            UpdateUserInput {
                email: payload.email,
                name: payload.name,
                phone: payload.phone,
            },
        )
        .await?;

    info!(user_id = %id_user, "User updated");
    Ok(Json(user.into()))
}
