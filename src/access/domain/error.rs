//! Error types for identity handling.

use thiserror::Error;

/// Errors raised while establishing who is acting.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AccessError {
    /// The request carried no authenticated identity.
    #[error("not authorized: no authenticated identity")]
    Unauthenticated,
}

/// Error returned while parsing roles from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);
