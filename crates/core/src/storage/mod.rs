//! Attachment store for uploaded files using Apache OpenDAL.
//!
//! Files live flat under a single root directory, one file per upload.
//! Names are generated here and are the only keys callers hold on to.
//!
//! # Layout
//!
//! ```text
//! {root}/
//! ├── 1736339200123456789.png
//! └── 1736339200123456790.jpg
//! ```
//!
//! | Operation          | Missing file           |
//! |--------------------|------------------------|
//! | `save`             | n/a (always new name)  |
//! | `read`             | `StorageError::NotFound` |
//! | `delete`           | success                |

mod config;
mod error;
mod naming;
mod service;

pub use config::StorageConfig;
pub use error::StorageError;
pub use naming::{content_type_for, extension_of, next_stamp};
pub use service::{AttachmentStore, StoredContent};
