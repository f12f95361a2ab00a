//! Post repository for forum database operations.

use chrono::Utc;
use nagari_shared::AppError;
use nagari_shared::types::{PostId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::{posts, users};

/// Error types for post operations.
#[derive(Debug, thiserror::Error)]
pub enum PostError {
    /// Post not found.
    #[error("Post {0} not found")]
    NotFound(PostId),

    /// Author does not exist.
    #[error("User {0} not found")]
    UserNotFound(UserId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<PostError> for AppError {
    fn from(err: PostError) -> Self {
        match err {
            PostError::NotFound(_) | PostError::UserNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            PostError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a post.
#[derive(Debug, Clone)]
pub struct CreatePostInput {
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
    /// Author.
    pub id_user: UserId,
}

/// Input for updating a post.
#[derive(Debug, Clone)]
pub struct UpdatePostInput {
    /// New title.
    pub title: String,
    /// New body.
    pub content: String,
}

/// Post repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct PostRepository {
    db: DatabaseConnection,
}

impl PostRepository {
    /// Creates a new post repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a post stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if the author does not exist, or a database error.
    pub async fn create(&self, input: CreatePostInput) -> Result<posts::Model, PostError> {
        let author = users::Entity::find_by_id(input.id_user.into_inner())
            .count(&self.db)
            .await?;
        if author == 0 {
            return Err(PostError::UserNotFound(input.id_user));
        }

        let post = posts::ActiveModel {
            id_posts: NotSet,
            title: Set(input.title),
            content: Set(input.content),
            id_user: Set(input.id_user.into_inner()),
            created_at: Set(Utc::now().naive_utc()),
        };

        let model = post.insert(&self.db).await?;
        tracing::info!(post_id = model.id_posts, user_id = model.id_user, "Post created");
        Ok(model)
    }

    /// Lists all posts ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<posts::Model>, DbErr> {
        posts::Entity::find()
            .order_by_asc(posts::Column::IdPosts)
            .all(&self.db)
            .await
    }

    /// Finds a post by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: PostId) -> Result<Option<posts::Model>, DbErr> {
        posts::Entity::find_by_id(id.into_inner()).one(&self.db).await
    }

    /// Lists a user's posts, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_user(&self, user_id: UserId) -> Result<Vec<posts::Model>, DbErr> {
        posts::Entity::find()
            .filter(posts::Column::IdUser.eq(user_id.into_inner()))
            .order_by_asc(posts::Column::CreatedAt)
            .order_by_asc(posts::Column::IdPosts)
            .all(&self.db)
            .await
    }

    /// Updates title and content.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the post does not exist, or a database error.
    pub async fn update(
        &self,
        id: PostId,
        input: UpdatePostInput,
    ) -> Result<posts::Model, PostError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or(PostError::NotFound(id))?;

        let mut post: posts::ActiveModel = existing.into();
        post.title = Set(input.title);
        post.content = Set(input.content);

        Ok(post.update(&self.db).await?)
    }

    /// Deletes a post.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the post does not exist, or a database error.
    pub async fn delete(&self, id: PostId) -> Result<(), PostError> {
        let result = posts::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(PostError::NotFound(id));
        }
        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }
}
