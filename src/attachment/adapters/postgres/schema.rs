//! Diesel schema for attachment persistence.

diesel::table! {
    /// Attachment metadata and payloads, one row per uploaded file.
    attachments (id) {
        /// Attachment identifier.
        id -> Uuid,
        /// Owning task identifier.
        task_id -> Uuid,
        /// Uploading user identifier.
        uploader_id -> Uuid,
        /// File name as uploaded.
        #[max_length = 255]
        original_file_name -> Varchar,
        /// Normalized file type token.
        #[max_length = 16]
        file_type -> Varchar,
        /// Payload size in bytes.
        file_size -> Int8,
        /// Hex-encoded SHA-256 digest of the payload.
        #[max_length = 64]
        content_digest -> Varchar,
        /// Stable retrieval key.
        storage_locator -> Text,
        /// Binary payload.
        content -> Bytea,
        /// Upload timestamp.
        upload_date -> Timestamptz,
    }
}
