//! Nagari API Server
//!
//! Main entry point for the forum backend service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nagari_api::{AppState, create_router};
use nagari_core::attachment::{AttachmentService, ReferenceCodec};
use nagari_core::storage::{AttachmentStore, StorageConfig};
use nagari_db::{UserRepository, connect};
use nagari_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nagari=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Connect to database
    let db = connect(&config.database).await?;
    info!("Connected to database");

    // Upload directory and the default picture's directory
    let uploads = &config.attachments;
    let store = AttachmentStore::from_config(
        StorageConfig::new(uploads.root.clone()).with_max_file_size(uploads.max_file_size),
    )?;
    store.ensure_directory().await?;
    let defaults = AttachmentStore::from_config(StorageConfig::new(uploads.default_root.clone()))?;
    info!(
        root = %uploads.root.display(),
        public_prefix = %uploads.public_prefix,
        default_path = %uploads.default_path,
        "Profile picture storage configured"
    );

    let attachments = AttachmentService::new(
        Arc::new(store),
        Arc::new(UserRepository::new(db.clone())),
        ReferenceCodec::new(uploads.public_prefix.clone(), uploads.default_path.clone()),
    )
    .with_default_store(Arc::new(defaults));

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        attachments: Arc::new(attachments),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
