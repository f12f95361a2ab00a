//! Schema migrations for the `users` and `posts` tables.
//!
//! `users.profile_picture` holds the stored picture reference, NULL when
//! unset. `posts.id_user` references `users.id_user`. Tables are built with
//! the schema builder so the same migration runs on Postgres and SQLite.

pub use sea_orm_migration::prelude::*;

mod m20260108_000001_initial;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20260108_000001_initial::Migration)]
    }
}
