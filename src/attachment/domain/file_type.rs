//! Accepted attachment file types and their media types.

use super::ParseFileTypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized category of an accepted attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// JPEG image (`.jpg` or `.jpeg`).
    Jpeg,
    /// PNG image.
    Png,
    /// PDF document.
    Pdf,
    /// Legacy Word document.
    Doc,
    /// Office Open XML Word document.
    Docx,
    /// Legacy Excel workbook.
    Xls,
    /// Office Open XML Excel workbook.
    Xlsx,
}

impl FileType {
    /// Every accepted file type.
    pub const ALL: [Self; 7] = [
        Self::Jpeg,
        Self::Png,
        Self::Pdf,
        Self::Doc,
        Self::Docx,
        Self::Xls,
        Self::Xlsx,
    ];

    /// Returns the short category token stored with the attachment.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Pdf => "pdf",
            Self::Doc => "doc",
            Self::Docx => "docx",
            Self::Xls => "xls",
            Self::Xlsx => "xlsx",
        }
    }

    /// Resolves a file type from a file name's extension.
    ///
    /// Returns `None` when the name has no extension or the extension is not
    /// accepted.
    #[must_use]
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (stem, extension) = file_name.trim().rsplit_once('.')?;
        if stem.is_empty() {
            return None;
        }
        Self::from_extension(extension)
    }

    /// Resolves a file type from a bare extension, case-insensitively.
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.trim().to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "pdf" => Some(Self::Pdf),
            "doc" => Some(Self::Doc),
            "docx" => Some(Self::Docx),
            "xls" => Some(Self::Xls),
            "xlsx" => Some(Self::Xlsx),
            _ => None,
        }
    }

    /// Resolves a file type from a declared media type.
    ///
    /// Media type parameters (`; charset=...`) and case are ignored.
    #[must_use]
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        let essence = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|file_type| file_type.media_types().contains(&essence.as_str()))
    }

    /// Returns the media types a client may declare for this file type.
    #[must_use]
    pub const fn media_types(self) -> &'static [&'static str] {
        match self {
            Self::Jpeg => &["image/jpeg", "image/jpg", "image/pjpeg"],
            Self::Png => &["image/png"],
            Self::Pdf => &["application/pdf"],
            Self::Doc => &["application/msword"],
            Self::Docx => {
                &["application/vnd.openxmlformats-officedocument.wordprocessingml.document"]
            }
            Self::Xls => &["application/vnd.ms-excel"],
            Self::Xlsx => &["application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"],
        }
    }

    /// Returns the content type used when serving the attachment.
    #[must_use]
    pub fn content_type(self) -> &'static str {
        content_type_for(self.as_str())
    }
}

impl TryFrom<&str> for FileType {
    type Error = ParseFileTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_extension(value).ok_or_else(|| ParseFileTypeError(value.to_owned()))
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a stored file type token to the content type used for transport.
///
/// Only images, PDFs, and plain text are served with a specific type; every
/// other token, including office documents, is served as
/// `application/octet-stream` so browsers download rather than render it.
#[must_use]
pub fn content_type_for(file_type: &str) -> &'static str {
    match file_type.trim().to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}
