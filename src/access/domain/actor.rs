//! Authenticated actors and the per-request identity context.

use super::{AccessError, ParseRoleError, UserId};
use serde::{Deserialize, Serialize};

/// Role granted to a user by the identity collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular user: sees and mutates only tasks they own or are assigned.
    User,
    /// Administrator: sees and mutates every task and may assign tasks.
    Admin,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

/// The authenticated identity performing an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    id: UserId,
    role: Role,
}

impl Actor {
    /// Creates an actor with the given identity and role.
    #[must_use]
    pub const fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    /// Creates a regular user actor.
    #[must_use]
    pub const fn user(id: UserId) -> Self {
        Self::new(id, Role::User)
    }

    /// Creates an administrator actor.
    #[must_use]
    pub const fn admin(id: UserId) -> Self {
        Self::new(id, Role::Admin)
    }

    /// Returns the actor's user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the actor's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns whether the actor is an administrator.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

/// Identity attached to a request before the core is invoked.
///
/// An anonymous context is a valid value: the transport layer may forward
/// requests whose credentials failed to resolve, and every operation turns
/// that into [`AccessError::Unauthenticated`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IdentityContext {
    actor: Option<Actor>,
}

impl IdentityContext {
    /// Creates a context for an authenticated actor.
    #[must_use]
    pub const fn authenticated(actor: Actor) -> Self {
        Self { actor: Some(actor) }
    }

    /// Creates a context with no authenticated actor.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { actor: None }
    }

    /// Returns the actor, if any.
    #[must_use]
    pub const fn actor(&self) -> Option<&Actor> {
        self.actor.as_ref()
    }

    /// Returns the actor or fails when the request is unauthenticated.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Unauthenticated`] when no actor is present.
    pub const fn require_actor(&self) -> Result<&Actor, AccessError> {
        match self.actor.as_ref() {
            Some(actor) => Ok(actor),
            None => Err(AccessError::Unauthenticated),
        }
    }
}

impl From<Actor> for IdentityContext {
    fn from(actor: Actor) -> Self {
        Self::authenticated(actor)
    }
}
