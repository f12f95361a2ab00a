//! Attachment error types.

use nagari_shared::AppError;
use nagari_shared::types::UserId;
use thiserror::Error;

use crate::storage::StorageError;

/// Attachment operation errors.
#[derive(Debug, Error)]
pub enum AttachmentError {
    /// Owning record does not exist.
    #[error("owner not found: {0}")]
    OwnerNotFound(UserId),

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The stored reference could not be updated.
    #[error("reference update failed: {0}")]
    ReferenceUpdateFailed(String),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),

    /// Reference is set but the file it names is missing.
    #[error("owner {owner_id} references missing file {path}")]
    DanglingReference {
        /// Owner whose slot is inconsistent.
        owner_id: UserId,
        /// Stored path with no file behind it.
        path: String,
    },
}

impl AttachmentError {
    /// Create an owner not found error.
    #[must_use]
    pub fn owner_not_found(id: UserId) -> Self {
        Self::OwnerNotFound(id)
    }

    /// Create a reference update error.
    #[must_use]
    pub fn reference_update_failed(msg: impl Into<String>) -> Self {
        Self::ReferenceUpdateFailed(msg.into())
    }

    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }

    /// Returns true for failures callers see as I/O failures.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::DanglingReference { .. })
    }
}

impl From<AttachmentError> for AppError {
    fn from(err: AttachmentError) -> Self {
        match err {
            AttachmentError::OwnerNotFound(id) => Self::NotFound(format!("User {id} not found")),
            AttachmentError::Storage(StorageError::FileTooLarge { max, .. }) => {
                Self::Validation(format!("File exceeds maximum size of {max} bytes"))
            }
            e @ (AttachmentError::Storage(_) | AttachmentError::DanglingReference { .. }) => {
                Self::Storage(e.to_string())
            }
            AttachmentError::ReferenceUpdateFailed(msg) | AttachmentError::Repository(msg) => {
                Self::Database(msg)
            }
        }
    }
}
