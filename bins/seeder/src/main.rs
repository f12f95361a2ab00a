//! Database seeder for Nagari development and testing.
//!
//! Seeds a few users (one pointing at the default profile picture) and
//! forum posts for local development. Safe to run repeatedly.
//!
//! Usage: cargo run --bin seeder

use nagari_db::repositories::{CreatePostInput, CreateUserInput, UserError};
use nagari_db::{PostRepository, UserRepository};
use nagari_shared::DatabaseConfig;
use nagari_shared::types::UserId;
use sea_orm::DatabaseConnection;

/// Stored reference of the shared default picture.
const DEFAULT_PICTURE: &str = "/default/profile_picture.png";

/// (email, name, phone, picture). Ids are left to the database.
const USERS: &[(&str, &str, Option<&str>, Option<&str>)] = &[
    ("ayu@nagari.dev", "Ayu Lestari", Some("081200000001"), None),
    ("bima@nagari.dev", "Bima Saputra", None, Some(DEFAULT_PICTURE)),
    ("citra@nagari.dev", "Citra Dewi", Some("081200000003"), None),
];

/// (author email, title, content)
const POSTS: &[(&str, &str, &str)] = &[
    ("ayu@nagari.dev", "Welcome to the forum", "Introduce yourself here."),
    ("bima@nagari.dev", "Posyandu schedule", "Does anyone know this month's schedule?"),
    ("ayu@nagari.dev", "Healthy recipes", "Share your favourite recipes for toddlers."),
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = nagari_db::connect(&DatabaseConfig {
        url: database_url,
        max_connections: 2,
        min_connections: 1,
    })
    .await
    .expect("Failed to connect to database");

    println!("Seeding users...");
    let created = seed_users(&db).await;

    if created {
        println!("Seeding posts...");
        seed_posts(&db).await;
    } else {
        println!("  Users already present, skipping posts...");
    }

    println!("Seeding complete!");
}

/// Seeds users; returns false if they were already there.
async fn seed_users(db: &DatabaseConnection) -> bool {
    let repo = UserRepository::new(db.clone());
    let mut created = false;

    for &(email, name, phone, picture) in USERS {
        let input = CreateUserInput {
            id_user: None,
            email: email.to_string(),
            name: name.to_string(),
            phone: phone.map(String::from),
            profile_picture: picture.map(String::from),
        };

        match repo.create(input).await {
            Ok(_) => {
                println!("  Created {email}");
                created = true;
            }
            Err(UserError::DuplicateEmail(_)) => {
                println!("  {email} already exists, skipping...");
            }
            Err(e) => panic!("Failed to seed user {email}: {e}"),
        }
    }

    created
}

async fn seed_posts(db: &DatabaseConnection) {
    let users = UserRepository::new(db.clone());
    let repo = PostRepository::new(db.clone());

    for &(author, title, content) in POSTS {
        let author = users
            .find_by_email(author)
            .await
            .expect("Failed to look up author")
            .unwrap_or_else(|| panic!("Author {author} was not seeded"));

        repo.create(CreatePostInput {
            title: title.to_string(),
            content: content.to_string(),
            id_user: UserId::new(author.id_user),
        })
        .await
        .expect("Failed to seed post");
        println!("  Created post '{title}'");
    }
}
