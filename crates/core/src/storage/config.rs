//! Storage configuration types.

use std::path::{Path, PathBuf};

/// Attachment store configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory all files of this kind are stored under.
    pub root: PathBuf,
    /// Maximum file size in bytes.
    pub max_file_size: u64,
}

impl StorageConfig {
    /// Default max file size: 10MB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

    /// Create a new storage config with default settings.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Set maximum file size.
    #[must_use]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_defaults() {
        let config = StorageConfig::new("./userProfile");
        assert_eq!(config.root(), Path::new("./userProfile"));
        assert_eq!(config.max_file_size, StorageConfig::DEFAULT_MAX_FILE_SIZE);
    }

    #[test]
    fn test_storage_config_max_file_size() {
        let config = StorageConfig::new("./userProfile").with_max_file_size(1024);
        assert_eq!(config.max_file_size, 1024);
    }
}
