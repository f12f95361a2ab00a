//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod post;
pub mod user;

pub use post::{CreatePostInput, PostError, PostRepository, UpdatePostInput};
pub use user::{CreateUserInput, UpdateUserInput, UserError, UserRepository};
