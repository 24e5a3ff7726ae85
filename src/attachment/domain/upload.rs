//! Upload payloads handed over by the transport layer.

use bytes::Bytes;

/// A file received with a create or update request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    file_name: String,
    media_type: String,
    content: Bytes,
}

impl UploadedFile {
    /// Creates an upload from its name, declared media type, and content.
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            content: content.into(),
        }
    }

    /// Returns the original file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the media type declared by the client.
    #[must_use]
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Returns the payload.
    #[must_use]
    pub const fn content(&self) -> &Bytes {
        &self.content
    }

    /// Returns the payload size in bytes.
    #[must_use]
    pub fn size_bytes(&self) -> u64 {
        u64::try_from(self.content.len()).unwrap_or(u64::MAX)
    }
}
