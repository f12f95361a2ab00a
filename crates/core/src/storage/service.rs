//! Attachment store implementation using Apache OpenDAL.

use std::path::{Component, Path};

use bytes::Bytes;
use futures::{Stream, StreamExt};
use opendal::{ErrorKind, Operator, Writer, services};
use tracing::{debug, warn};

use super::config::StorageConfig;
use super::error::StorageError;
use super::naming::{content_type_for, generate_name};

/// A file read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredContent {
    /// File contents.
    pub bytes: Bytes,
    /// Content type inferred from the file extension.
    pub content_type: &'static str,
}

/// Filesystem store for uploaded files under a single root directory.
pub struct AttachmentStore {
    operator: Operator,
    config: StorageConfig,
}

impl AttachmentStore {
    /// Create a new attachment store from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be used as a filesystem backend.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let root = config
            .root
            .to_str()
            .ok_or_else(|| StorageError::configuration("invalid path"))?;

        let builder = services::Fs::default().root(root);
        let operator = Operator::new(builder)
            .map_err(|e| StorageError::configuration(e.to_string()))?
            .finish();

        Ok(Self { operator, config })
    }

    /// Create the root directory if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub async fn ensure_directory(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.config.root).await?;
        Ok(())
    }

    /// Write an upload to a freshly generated name and return that name.
    ///
    /// Nothing is left under the generated name unless this returns `Ok`.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload stream fails, exceeds the size limit,
    /// or cannot be written.
    pub async fn save<S, B, E>(&self, content: S, original_name: &str) -> Result<String, StorageError>
    where
        S: Stream<Item = Result<B, E>> + Send,
        B: Into<Bytes> + Send,
        E: std::fmt::Display + Send,
    {
        let name = generate_name(original_name);
        let mut writer = self.operator.writer(&name).await?;
        let mut content = std::pin::pin!(content);
        let mut written: u64 = 0;

        while let Some(chunk) = content.next().await {
            let chunk: Bytes = match chunk {
                Ok(chunk) => chunk.into(),
                Err(e) => {
                    let msg = format!("upload stream failed: {e}");
                    self.discard(writer, &name).await;
                    return Err(StorageError::io(msg));
                }
            };

            written = written.saturating_add(u64::try_from(chunk.len()).unwrap_or(u64::MAX));
            if written > self.config.max_file_size {
                self.discard(writer, &name).await;
                return Err(StorageError::file_too_large(
                    written,
                    self.config.max_file_size,
                ));
            }

            if let Err(e) = writer.write(chunk).await {
                self.discard(writer, &name).await;
                return Err(e.into());
            }
        }

        if let Err(e) = writer.close().await {
            self.remove_partial(&name).await;
            return Err(e.into());
        }

        debug!(name = %name, bytes = written, "Stored upload");
        Ok(name)
    }

    /// Remove a stored file. A file that is already gone counts as removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the name does not resolve under the root or the
    /// file exists but cannot be removed.
    pub async fn delete(&self, name: &str) -> Result<(), StorageError> {
        validate_name(name)?;
        match self.operator.delete(name).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Read a stored file fully.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the name does not resolve to an existing file
    /// under the root, and an I/O error if it cannot be read.
    pub async fn read(&self, name: &str) -> Result<StoredContent, StorageError> {
        validate_name(name).map_err(|_| StorageError::not_found(name))?;

        let buffer = self.operator.read(name).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::not_found(name)
            } else {
                StorageError::from(e)
            }
        })?;

        Ok(StoredContent {
            bytes: buffer.to_bytes(),
            content_type: content_type_for(name),
        })
    }

    /// Check if a file exists in storage.
    pub async fn exists(&self, name: &str) -> bool {
        if validate_name(name).is_err() {
            return false;
        }
        match self.operator.stat(name).await {
            Ok(meta) => meta.is_file(),
            Err(_) => false,
        }
    }

    /// Root directory of this store.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.config.root()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    async fn discard(&self, mut writer: Writer, name: &str) {
        if let Err(e) = writer.abort().await {
            debug!(name = %name, error = %e, "Aborting upload writer failed");
        }
        self.remove_partial(name).await;
    }

    async fn remove_partial(&self, name: &str) {
        if let Err(e) = self.delete(name).await {
            warn!(name = %name, error = %e, "Failed to remove partial upload");
        }
    }
}

/// A name must be exactly one normal path component.
fn validate_name(name: &str) -> Result<(), StorageError> {
    if name.contains(['/', '\\']) {
        return Err(StorageError::invalid_name(name));
    }
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(StorageError::invalid_name(name)),
    }
}
