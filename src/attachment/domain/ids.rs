//! Identifier and locator types for attachments.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a stored attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttachmentId(Uuid);

impl AttachmentId {
    /// Creates a new random attachment identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an attachment identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for AttachmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AttachmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable retrieval key for an attachment.
///
/// Always derived from the attachment identifier, never from the uploaded
/// file name, so two uploads of `report.pdf` cannot collide and a crafted
/// name cannot escape the retrieval namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageLocator(String);

impl StorageLocator {
    /// Path segment under which attachments are served.
    pub const ROUTE_PREFIX: &'static str = "/api/tasks/attachments";

    /// Builds the locator for `id` beneath `base_url`.
    ///
    /// An empty base yields a host-relative path.
    #[must_use]
    pub fn for_attachment(base_url: &str, id: AttachmentId) -> Self {
        let base = base_url.trim_end_matches('/');
        Self(format!("{base}{}/{id}", Self::ROUTE_PREFIX))
    }

    /// Wraps a persisted locator value.
    #[must_use]
    pub fn from_persisted(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the locator as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for StorageLocator {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for StorageLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
