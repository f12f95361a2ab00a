//! Profile picture service: replace, clear, and read one owner's slot.
//!
//! The file and the stored reference live in two systems with no shared
//! transaction. Every transition follows the same ordering:
//!
//! 1. write the new file (if any)
//! 2. commit the reference
//! 3. delete the superseded file (if any, and never the default picture)
//!
//! A failure before step 2 leaves the old state intact. A failure at or
//! after step 2 can only leave an orphaned file, never a reference to a
//! missing one. Orphans are logged at `warn` so a sweep can collect them.

use std::sync::Arc;

use bytes::Bytes;
use futures::Stream;
use nagari_shared::types::UserId;
use tracing::{error, info, warn};

use super::error::AttachmentError;
use super::lock::OwnerLocks;
use super::types::{AttachmentRef, ReferenceCodec};
use crate::storage::{AttachmentStore, StorageError, StoredContent};

/// Repository trait for the stored reference of an owner's picture.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait ReferenceRepository: Send + Sync {
    /// Stored reference of an owner; `OwnerNotFound` if the owner is absent.
    fn get_reference(
        &self,
        owner_id: UserId,
    ) -> impl std::future::Future<Output = Result<Option<String>, AttachmentError>> + Send;

    /// Overwrite the stored reference of an owner.
    fn set_reference(
        &self,
        owner_id: UserId,
        path: Option<&str>,
    ) -> impl std::future::Future<Output = Result<(), AttachmentError>> + Send;

    /// Check if the owner exists.
    fn owner_exists(
        &self,
        owner_id: UserId,
    ) -> impl std::future::Future<Output = Result<bool, AttachmentError>> + Send;
}

/// Attachment service keeping pictures and stored references consistent.
pub struct AttachmentService<R: ReferenceRepository> {
    store: Arc<AttachmentStore>,
    defaults: Option<Arc<AttachmentStore>>,
    repo: Arc<R>,
    codec: ReferenceCodec,
    locks: OwnerLocks<UserId>,
}

impl<R: ReferenceRepository> AttachmentService<R> {
    /// Create a new attachment service.
    #[must_use]
    pub fn new(store: Arc<AttachmentStore>, repo: Arc<R>, codec: ReferenceCodec) -> Self {
        Self {
            store,
            defaults: None,
            repo,
            codec,
            locks: OwnerLocks::new(),
        }
    }

    /// Serve the default picture from `defaults` for owners in `DefaultSet`.
    #[must_use]
    pub fn with_default_store(mut self, defaults: Arc<AttachmentStore>) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Replace an owner's picture with a new upload and return the new stored path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Owner does not exist (no file is written)
    /// - The upload cannot be saved (old picture untouched)
    /// - The reference cannot be updated (new file left as an orphan)
    pub async fn replace<S, B, E>(
        &self,
        owner_id: UserId,
        content: S,
        original_name: &str,
    ) -> Result<String, AttachmentError>
    where
        S: Stream<Item = Result<B, E>> + Send,
        B: Into<Bytes> + Send,
        E: std::fmt::Display + Send,
    {
        let _guard = self.locks.lock(owner_id).await;

        let previous = self.current(owner_id).await?;

        let name = self.store.save(content, original_name).await?;
        let new_path = self.codec.user_path(&name);

        if let Err(e) = self.repo.set_reference(owner_id, Some(&new_path)).await {
            warn!(
                owner_id = %owner_id,
                orphan = %new_path,
                error = %e,
                "Reference update failed, new file orphaned"
            );
            return Err(AttachmentError::reference_update_failed(e.to_string()));
        }

        if let Some(old_path) = previous.user_path() {
            self.remove_superseded(owner_id, old_path).await;
        }

        info!(owner_id = %owner_id, path = %new_path, "Profile picture replaced");
        Ok(new_path)
    }

    /// Clear an owner's picture. Clearing an empty slot succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the owner does not exist or the reference cannot
    /// be updated.
    pub async fn clear(&self, owner_id: UserId) -> Result<(), AttachmentError> {
        let _guard = self.locks.lock(owner_id).await;

        let stored = self.repo.get_reference(owner_id).await?;
        let previous = self.codec.decode(stored.as_deref());

        if stored.is_some() {
            self.repo
                .set_reference(owner_id, None)
                .await
                .map_err(|e| AttachmentError::reference_update_failed(e.to_string()))?;
        }

        if let Some(old_path) = previous.user_path() {
            self.remove_superseded(owner_id, old_path).await;
        }

        info!(owner_id = %owner_id, "Profile picture cleared");
        Ok(())
    }

    /// Read an owner's picture. `None` means no picture is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the owner does not exist, or a set reference
    /// points at a missing or unreadable file.
    pub async fn read(&self, owner_id: UserId) -> Result<Option<StoredContent>, AttachmentError> {
        match self.current(owner_id).await? {
            AttachmentRef::Unset => Ok(None),
            AttachmentRef::DefaultSet => self.read_default().await.map(Some),
            AttachmentRef::UserSet(path) => {
                let Some(name) = self.codec.file_name(&path) else {
                    return Err(self.dangling(owner_id, path));
                };
                match self.store.read(name).await {
                    Ok(content) => Ok(Some(content)),
                    Err(StorageError::NotFound { .. }) => Err(self.dangling(owner_id, path)),
                    Err(e) => Err(e.into()),
                }
            }
        }
    }

    /// Decoded state of an owner's slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the owner does not exist or the lookup fails.
    pub async fn current(&self, owner_id: UserId) -> Result<AttachmentRef, AttachmentError> {
        let stored = self.repo.get_reference(owner_id).await?;
        Ok(self.codec.decode(stored.as_deref()))
    }

    /// Check if the owner exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    pub async fn owner_exists(&self, owner_id: UserId) -> Result<bool, AttachmentError> {
        self.repo.owner_exists(owner_id).await
    }

    /// Reference codec used for stored values.
    #[must_use]
    pub fn codec(&self) -> &ReferenceCodec {
        &self.codec
    }

    /// Store holding uploaded pictures.
    #[must_use]
    pub fn store(&self) -> &AttachmentStore {
        &self.store
    }

    async fn read_default(&self) -> Result<StoredContent, AttachmentError> {
        let Some(defaults) = &self.defaults else {
            return Err(StorageError::not_found(self.codec.default_path()).into());
        };
        Ok(defaults.read(self.codec.default_file_name()).await?)
    }

    /// Post-commit cleanup. The reference already points elsewhere, so a
    /// failure here only leaves an orphan.
    async fn remove_superseded(&self, owner_id: UserId, old_path: &str) {
        let Some(name) = self.codec.file_name(old_path) else {
            warn!(owner_id = %owner_id, path = %old_path, "Superseded path outside upload root, left in place");
            return;
        };
        if let Err(e) = self.store.delete(name).await {
            warn!(
                owner_id = %owner_id,
                orphan = %old_path,
                error = %e,
                "Failed to delete superseded picture"
            );
        }
    }

    fn dangling(&self, owner_id: UserId, path: String) -> AttachmentError {
        error!(
            owner_id = %owner_id,
            path = %path,
            root = %self.store.root().display(),
            "Stored reference points at a missing file"
        );
        AttachmentError::DanglingReference { owner_id, path }
    }
}
