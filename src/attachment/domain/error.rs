//! Error types for attachment validation and parsing.

use thiserror::Error;

/// Errors returned while validating an upload.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AttachmentDomainError {
    /// The extension or the declared media type is not accepted.
    #[error(
        "unsupported file type for '{file_name}' ({media_type}); accepted: pdf, images, Word, Excel"
    )]
    UnsupportedFileType {
        /// Original file name.
        file_name: String,
        /// Media type declared by the client.
        media_type: String,
    },

    /// The payload exceeds the configured limit.
    #[error("file '{file_name}' is {size_bytes} bytes, limit is {limit_bytes} bytes")]
    PayloadTooLarge {
        /// Original file name.
        file_name: String,
        /// Actual payload size.
        size_bytes: u64,
        /// Configured limit.
        limit_bytes: u64,
    },
}

/// Error returned while parsing file types from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown file type: {0}")]
pub struct ParseFileTypeError(pub String);
