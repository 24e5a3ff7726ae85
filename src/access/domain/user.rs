//! Display projection of a user.

use super::UserId;
use serde::{Deserialize, Serialize};

/// Display-friendly summary of a user, safe to embed in listings.
///
/// Carries no credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// User identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Contact email address.
    pub email: String,
}

impl UserSummary {
    /// Creates a user summary.
    #[must_use]
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }
}
