//! Shared test helpers for in-memory integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskdeck::{
    access::{
        adapters::memory::InMemoryUserDirectory,
        domain::{Actor, IdentityContext, UserId, UserSummary},
    },
    attachment::{adapters::memory::InMemoryAttachmentRepository, domain::UploadedFile},
    stats::services::StatsAggregator,
    task::{adapters::memory::InMemoryTaskRepository, services::TaskService},
};

/// Task service wired to in-memory adapters.
pub type MemoryTaskService = TaskService<
    InMemoryTaskRepository,
    InMemoryAttachmentRepository,
    InMemoryUserDirectory,
    DefaultClock,
>;

/// A service, a statistics aggregator, and three registered users.
pub struct Deck {
    /// Task service under test.
    pub service: MemoryTaskService,
    /// Statistics over the service's task repository.
    pub stats: StatsAggregator<InMemoryTaskRepository>,
    /// A regular user who creates tasks.
    pub owner: UserId,
    /// A regular user tasks get delegated to.
    pub assignee: UserId,
    /// An administrator.
    pub admin: UserId,
}

impl Deck {
    /// Identity of the owner.
    #[must_use]
    pub const fn owner_ctx(&self) -> IdentityContext {
        IdentityContext::authenticated(Actor::user(self.owner))
    }

    /// Identity of the assignee.
    #[must_use]
    pub const fn assignee_ctx(&self) -> IdentityContext {
        IdentityContext::authenticated(Actor::user(self.assignee))
    }

    /// Identity of the administrator.
    #[must_use]
    pub const fn admin_ctx(&self) -> IdentityContext {
        IdentityContext::authenticated(Actor::admin(self.admin))
    }
}

/// Provides a fresh deck for each test.
///
/// # Panics
///
/// Panics if the in-memory directory rejects a user.
#[fixture]
pub fn deck() -> Deck {
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let users = Arc::new(InMemoryUserDirectory::new());
    let owner = UserId::new();
    let assignee = UserId::new();
    let admin = UserId::new();
    for (id, name, email) in [
        (owner, "Olive", "olive@example.com"),
        (assignee, "Asa", "asa@example.com"),
        (admin, "Ada", "ada@example.com"),
    ] {
        users
            .insert(UserSummary::new(id, name, email))
            .expect("directory should accept users");
    }

    Deck {
        service: TaskService::new(
            Arc::clone(&tasks),
            Arc::new(InMemoryAttachmentRepository::new()),
            users,
            Arc::new(DefaultClock),
        ),
        stats: StatsAggregator::new(tasks),
        owner,
        assignee,
        admin,
    }
}

/// Builds a PDF upload.
#[must_use]
pub fn pdf(name: &str) -> UploadedFile {
    UploadedFile::new(name, "application/pdf", b"%PDF-1.7 sample".to_vec())
}
