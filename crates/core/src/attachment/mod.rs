//! Profile picture slots and the protocol that keeps them consistent.
//!
//! Each owner has one slot whose state lives in a nullable reference column
//! while the bytes live in the [`AttachmentStore`](crate::storage::AttachmentStore).
//! [`AttachmentService`] is the only writer of both.

mod error;
mod lock;
mod service;
mod types;

pub use error::AttachmentError;
pub use lock::{OwnerGuard, OwnerLocks};
pub use service::{AttachmentService, ReferenceRepository};
pub use types::{AttachmentRef, ReferenceCodec};
