//! Application services for attachment ingestion and retrieval.

mod download;
mod error;
mod store;

pub use download::AttachmentDownload;
pub use error::{AttachmentStoreError, AttachmentStoreResult};
pub use store::AttachmentStore;
