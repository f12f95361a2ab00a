//! User repository for database operations.
//!
//! Besides CRUD, this is the persistence side of the profile picture
//! protocol: it implements [`ReferenceRepository`] on `users.profile_picture`.
//! Nothing else in this repository writes that column after creation.

use nagari_core::attachment::{AttachmentError, ReferenceRepository};
use nagari_shared::AppError;
use nagari_shared::types::UserId;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, DbErr,
    EntityTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::users;

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// User not found.
    #[error("User {0} not found")]
    NotFound(UserId),

    /// A user with this id already exists.
    #[error("User {0} already exists")]
    DuplicateId(UserId),

    /// Email is taken by another user.
    #[error("Email '{0}' already registered")]
    DuplicateEmail(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => Self::NotFound(err.to_string()),
            UserError::DuplicateId(_) | UserError::DuplicateEmail(_) => {
                Self::Conflict(err.to_string())
            }
            UserError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a user.
#[derive(Debug, Clone, Default)]
pub struct CreateUserInput {
    /// Explicit key; assigned by the database when `None`.
    pub id_user: Option<UserId>,
    /// Email address, unique across users.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Initial picture reference, stored as given. Empty means none.
    pub profile_picture: Option<String>,
}

/// Input for updating a user's profile fields.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    /// New email address.
    pub email: String,
    /// New display name.
    pub name: String,
    /// New phone number; `None` clears it to an empty string.
    pub phone: Option<String>,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all users ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<users::Model>, DbErr> {
        users::Entity::find()
            .order_by_asc(users::Column::IdUser)
            .all(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id.into_inner()).one(&self.db).await
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateId` or `DuplicateEmail` if the user clashes with an
    /// existing one, or a database error if the insert fails.
    pub async fn create(&self, input: CreateUserInput) -> Result<users::Model, UserError> {
        if let Some(id) = input.id_user
            && self.exists(id).await?
        {
            return Err(UserError::DuplicateId(id));
        }
        if self.find_by_email(&input.email).await?.is_some() {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let user = users::ActiveModel {
            id_user: input.id_user.map_or(NotSet, |id| Set(id.into_inner())),
            email: Set(input.email),
            name: Set(input.name),
            phone: Set(input.phone),
            profile_picture: Set(input.profile_picture.filter(|p| !p.is_empty())),
        };

        let model = user.insert(&self.db).await?;
        if input.id_user.is_some() {
            self.sync_id_sequence().await?;
        }
        tracing::info!(user_id = model.id_user, "User created");
        Ok(model)
    }

    /// Moves the Postgres id sequence past the highest stored id, so
    /// generated ids never collide with explicitly inserted ones. SQLite
    /// already picks `MAX(rowid) + 1`.
    async fn sync_id_sequence(&self) -> Result<(), DbErr> {
        if self.db.get_database_backend() != DbBackend::Postgres {
            return Ok(());
        }
        self.db
            .execute_unprepared(
                "SELECT setval(pg_get_serial_sequence('users', 'id_user'), \
                 (SELECT MAX(id_user) FROM users))",
            )
            .await?;
        Ok(())
    }

    /// Returns the user with this email, creating it first if it is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query or insert fails.
    pub async fn sign_in(&self, email: &str, name: &str) -> Result<users::Model, DbErr> {
        if let Some(existing) = self.find_by_email(email).await? {
            return Ok(existing);
        }

        let user = users::ActiveModel {
            id_user: NotSet,
            email: Set(email.to_string()),
            name: Set(name.to_string()),
            phone: Set(None),
            profile_picture: Set(None),
        };
        let model = user.insert(&self.db).await?;
        tracing::info!(user_id = model.id_user, "User registered on sign-in");
        Ok(model)
    }

    /// Updates email, name, and phone. The picture reference is left as is.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user does not exist, `DuplicateEmail` if the
    /// new email belongs to another user, or a database error.
    pub async fn update(
        &self,
        id: UserId,
        input: UpdateUserInput,
    ) -> Result<users::Model, UserError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        if existing.email != input.email
            && let Some(other) = self.find_by_email(&input.email).await?
            && other.id_user != existing.id_user
        {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let mut user: users::ActiveModel = existing.into();
        user.email = Set(input.email);
        user.name = Set(input.name);
        user.phone = Set(Some(input.phone.unwrap_or_default()));

        Ok(user.update(&self.db).await?)
    }

    /// Checks if a user exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn exists(&self, id: UserId) -> Result<bool, DbErr> {
        let count = users::Entity::find_by_id(id.into_inner())
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}

impl ReferenceRepository for UserRepository {
    async fn get_reference(&self, owner_id: UserId) -> Result<Option<String>, AttachmentError> {
        let row: Option<Option<String>> = users::Entity::find_by_id(owner_id.into_inner())
            .select_only()
            .column(users::Column::ProfilePicture)
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(|e| AttachmentError::repository(e.to_string()))?;

        row.ok_or(AttachmentError::OwnerNotFound(owner_id))
    }

    async fn set_reference(
        &self,
        owner_id: UserId,
        path: Option<&str>,
    ) -> Result<(), AttachmentError> {
        let result = users::Entity::update_many()
            .col_expr(
                users::Column::ProfilePicture,
                Expr::value(path.map(str::to_string)),
            )
            .filter(users::Column::IdUser.eq(owner_id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(|e| AttachmentError::repository(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AttachmentError::OwnerNotFound(owner_id));
        }
        Ok(())
    }

    async fn owner_exists(&self, owner_id: UserId) -> Result<bool, AttachmentError> {
        self.exists(owner_id)
            .await
            .map_err(|e| AttachmentError::repository(e.to_string()))
    }
}
