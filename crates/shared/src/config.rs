//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Profile picture storage configuration.
    #[serde(default)]
    pub attachments: AttachmentConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Profile picture storage configuration.
///
/// `root` is where uploads live on disk; `public_prefix` is how they are
/// referenced from the `profile_picture` column. The default image lives
/// apart from uploads and is referenced by `default_path`.
#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentConfig {
    /// Directory that holds uploaded pictures.
    #[serde(default = "default_attachment_root")]
    pub root: PathBuf,
    /// Prefix of stored references to uploaded pictures.
    #[serde(default = "default_public_prefix")]
    pub public_prefix: String,
    /// Directory that holds the default picture.
    #[serde(default = "default_default_root")]
    pub default_root: PathBuf,
    /// Stored reference meaning "default picture".
    #[serde(default = "default_default_path")]
    pub default_path: String,
    /// Maximum accepted upload size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

impl Default for AttachmentConfig {
    fn default() -> Self {
        Self {
            root: default_attachment_root(),
            public_prefix: default_public_prefix(),
            default_root: default_default_root(),
            default_path: default_default_path(),
            max_file_size: default_max_file_size(),
        }
    }
}

fn default_attachment_root() -> PathBuf {
    PathBuf::from("./userProfile")
}

fn default_public_prefix() -> String {
    "/userProfile".to_string()
}

fn default_default_root() -> PathBuf {
    PathBuf::from("./default")
}

fn default_default_path() -> String {
    "/default/profile_picture.png".to_string()
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024 // 10MB
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("NAGARI").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
