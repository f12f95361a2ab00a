//! Attachment slot states and their stored representation.

/// State of one owner's attachment slot.
///
/// The stored column is a plain nullable string; [`ReferenceCodec`] is the
/// only place that translates between the two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentRef {
    /// No picture; callers render `null`.
    Unset,
    /// A user upload, holding the stored path (e.g. `/userProfile/1736….png`).
    UserSet(String),
    /// The shared default picture. Never deleted.
    DefaultSet,
}

impl AttachmentRef {
    /// Returns true if the slot holds nothing.
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Stored path of a user upload, if this slot holds one.
    #[must_use]
    pub fn user_path(&self) -> Option<&str> {
        match self {
            Self::UserSet(path) => Some(path),
            Self::Unset | Self::DefaultSet => None,
        }
    }
}

/// Maps between [`AttachmentRef`] and the stored column value.
///
/// | Stored value                   | Slot                  |
/// |--------------------------------|-----------------------|
/// | `NULL` or `""`                 | `Unset`               |
/// | `default_path`                 | `DefaultSet`          |
/// | `{public_prefix}/{name}`       | `UserSet` (store key `name`) |
/// | anything else                  | `UserSet` (no store key) |
#[derive(Debug, Clone)]
pub struct ReferenceCodec {
    public_prefix: String,
    default_path: String,
}

impl ReferenceCodec {
    /// Create a codec for uploads referenced under `public_prefix` and the
    /// default picture referenced as `default_path`.
    #[must_use]
    pub fn new(public_prefix: impl Into<String>, default_path: impl Into<String>) -> Self {
        let public_prefix = public_prefix.into().trim_end_matches('/').to_string();
        Self {
            public_prefix,
            default_path: default_path.into(),
        }
    }

    /// Decode a stored column value.
    #[must_use]
    pub fn decode(&self, stored: Option<&str>) -> AttachmentRef {
        match stored {
            None | Some("") => AttachmentRef::Unset,
            Some(path) if path == self.default_path => AttachmentRef::DefaultSet,
            Some(path) => AttachmentRef::UserSet(path.to_string()),
        }
    }

    /// Encode a slot as a stored column value.
    #[must_use]
    pub fn encode(&self, slot: &AttachmentRef) -> Option<String> {
        match slot {
            AttachmentRef::Unset => None,
            AttachmentRef::UserSet(path) => Some(path.clone()),
            AttachmentRef::DefaultSet => Some(self.default_path.clone()),
        }
    }

    /// Stored path for a freshly saved file.
    #[must_use]
    pub fn user_path(&self, name: &str) -> String {
        format!("{}/{name}", self.public_prefix)
    }

    /// Store key of a stored upload path, or `None` if the path is not
    /// under the public prefix.
    #[must_use]
    pub fn file_name<'a>(&self, path: &'a str) -> Option<&'a str> {
        path.strip_prefix(self.public_prefix.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| !name.is_empty())
    }

    /// Stored value meaning "default picture".
    #[must_use]
    pub fn default_path(&self) -> &str {
        &self.default_path
    }

    /// File name of the default picture inside its own directory.
    #[must_use]
    pub fn default_file_name(&self) -> &str {
        self.default_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.default_path)
    }
}
