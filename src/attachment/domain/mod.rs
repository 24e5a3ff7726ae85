//! Domain model for attachments.
//!
//! Covers the accepted file types, upload payloads as received from the
//! transport layer, stored attachments, and the references embedded in
//! tasks.

mod attachment;
mod error;
mod file_type;
mod ids;
mod upload;

pub use attachment::{Attachment, AttachmentMetadata, AttachmentRef, PersistedAttachmentData};
pub use error::{AttachmentDomainError, ParseFileTypeError};
pub use file_type::{FileType, content_type_for};
pub use ids::{AttachmentId, StorageLocator};
pub use upload::UploadedFile;
