//! Transport-ready view of a stored attachment.

use crate::attachment::domain::{AttachmentMetadata, content_type_for};
use bytes::Bytes;

/// Name used in the disposition header when the original name is blank.
const FALLBACK_FILE_NAME: &str = "downloaded-file";

/// Everything a transport layer needs to serve an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentDownload {
    /// Content type derived from the stored file type.
    pub content_type: &'static str,
    /// Original file name, or a fallback when it was blank.
    pub file_name: String,
    /// `Content-Disposition` value with the file name percent-encoded.
    pub content_disposition: String,
    /// Binary payload.
    pub content: Bytes,
}

impl AttachmentDownload {
    /// Builds the download view for an attachment.
    #[must_use]
    pub fn new(metadata: &AttachmentMetadata, content: Bytes) -> Self {
        let file_name = if metadata.original_file_name.trim().is_empty() {
            FALLBACK_FILE_NAME.to_owned()
        } else {
            metadata.original_file_name.clone()
        };
        let content_disposition =
            format!("inline; filename=\"{}\"", urlencoding::encode(&file_name));

        Self {
            content_type: content_type_for(metadata.file_type.as_str()),
            file_name,
            content_disposition,
            content,
        }
    }
}
