//! Task authorization decisions.
//!
//! [`AccessPolicy`] is a pure function of the actor, the task's parties, and
//! the requested [`TaskAction`]. [`VisibilityScope`] derives the set of tasks
//! an actor may list or aggregate over; task listing and statistics share it
//! so the two can never disagree.

use super::domain::{Actor, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The parties attached to a task, as seen by the access policy.
pub trait TaskParties {
    /// Returns the task owner.
    fn owner(&self) -> UserId;

    /// Returns the assignee, if the task is delegated.
    fn assignee(&self) -> Option<UserId>;
}

/// Action an actor wants to perform on a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskAction {
    /// View the task and download its attachments.
    Read,
    /// Change task fields, add attachments, or remove attachments.
    Update,
    /// Remove the task and all of its attachments.
    Delete,
    /// Set or clear the task's assignee.
    Assign,
    /// Change the task's owner.
    TransferOwnership,
}

impl TaskAction {
    /// Returns the canonical representation used in messages and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Assign => "assign",
            Self::TransferOwnership => "transfer_ownership",
        }
    }
}

impl fmt::Display for TaskAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an action was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// Task ownership is fixed at creation.
    OwnershipImmutable,
    /// Only administrators may perform the action.
    AdminOnly,
    /// The actor neither owns nor is assigned the task.
    NotParticipant,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OwnershipImmutable => "task ownership cannot be changed",
            Self::AdminOnly => "only administrators may do this",
            Self::NotParticipant => "actor is neither owner nor assignee",
        })
    }
}

/// Outcome of a policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// The action is permitted.
    Allow,
    /// The action is refused.
    Deny(DenyReason),
}

impl AccessDecision {
    /// Returns whether the decision permits the action.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Ownership and role aware task access policy.
///
/// Rules are evaluated in order and the first match wins:
///
/// 1. nobody may transfer ownership;
/// 2. administrators may do anything else;
/// 3. owners and assignees may read, update, and delete, but not assign.
///
/// # Examples
///
/// ```
/// use taskdeck::access::domain::{Actor, UserId};
/// use taskdeck::access::policy::{AccessPolicy, TaskAction, TaskParties};
///
/// struct Parties(UserId, Option<UserId>);
/// impl TaskParties for Parties {
///     fn owner(&self) -> UserId { self.0 }
///     fn assignee(&self) -> Option<UserId> { self.1 }
/// }
///
/// let owner = UserId::new();
/// let task = Parties(owner, None);
/// assert!(AccessPolicy::can_act(&Actor::user(owner), &task, TaskAction::Update));
/// assert!(!AccessPolicy::can_act(&Actor::user(owner), &task, TaskAction::Assign));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessPolicy;

impl AccessPolicy {
    /// Evaluates whether `actor` may perform `action` on `task`.
    #[must_use]
    pub fn decide(actor: &Actor, task: &impl TaskParties, action: TaskAction) -> AccessDecision {
        if action == TaskAction::TransferOwnership {
            return AccessDecision::Deny(DenyReason::OwnershipImmutable);
        }
        if actor.is_admin() {
            return AccessDecision::Allow;
        }
        if !is_participant(actor.id(), task) {
            return AccessDecision::Deny(DenyReason::NotParticipant);
        }
        match action {
            TaskAction::Read | TaskAction::Update | TaskAction::Delete => AccessDecision::Allow,
            TaskAction::Assign | TaskAction::TransferOwnership => {
                AccessDecision::Deny(DenyReason::AdminOnly)
            }
        }
    }

    /// Returns whether `actor` may perform `action` on `task`.
    #[must_use]
    pub fn can_act(actor: &Actor, task: &impl TaskParties, action: TaskAction) -> bool {
        Self::decide(actor, task, action).is_allowed()
    }
}

fn is_participant(user: UserId, task: &impl TaskParties) -> bool {
    task.owner() == user || task.assignee() == Some(user)
}

/// Set of tasks an actor may list or aggregate over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisibilityScope {
    /// Every task in the system.
    All,
    /// Tasks the user owns or is assigned.
    Participant(UserId),
}

impl VisibilityScope {
    /// Derives the visibility scope for an actor.
    #[must_use]
    pub const fn for_actor(actor: &Actor) -> Self {
        if actor.is_admin() {
            Self::All
        } else {
            Self::Participant(actor.id())
        }
    }

    /// Returns whether `task` falls inside this scope.
    #[must_use]
    pub fn includes(&self, task: &impl TaskParties) -> bool {
        match self {
            Self::All => true,
            Self::Participant(user) => is_participant(*user, task),
        }
    }
}
