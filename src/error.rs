//! Crate-wide error classification.
//!
//! Each bounded context keeps its own `thiserror` enums. [`ErrorKind`] is the
//! machine-distinguishable category every service error maps onto, so a
//! transport layer can choose a status code without matching on every
//! variant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status reported for a successful task creation.
pub const CREATED_STATUS: u16 = 201;

/// Status reported for every other successful operation.
pub const OK_STATUS: u16 = 200;

/// Machine-distinguishable failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing or malformed input, including rejected uploads.
    Validation,
    /// No authenticated identity accompanied the request.
    Unauthenticated,
    /// The access policy denied the action.
    Forbidden,
    /// A task or attachment could not be resolved.
    NotFound,
    /// A concurrent mutation invalidated the loaded state.
    Conflict,
    /// External I/O exceeded its time budget.
    Timeout,
    /// Persisting or reading data failed.
    StorageFailure,
    /// A multi-step write failed after some data was stored and could not be
    /// rolled back.
    PartialWrite,
}

impl ErrorKind {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Unauthenticated => "unauthenticated",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Timeout => "timeout",
            Self::StorageFailure => "storage_failure",
            Self::PartialWrite => "partial_write",
        }
    }

    /// Returns the default HTTP status for this category.
    ///
    /// Policy denials map to 401 because existing clients treat both
    /// authentication and authorization failures that way.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::Unauthenticated | Self::Forbidden => 401,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::Timeout => 503,
            Self::StorageFailure | Self::PartialWrite => 500,
        }
    }

    /// Returns whether the caller may retry the same request unchanged.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Conflict | Self::Timeout)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
