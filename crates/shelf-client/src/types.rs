use serde::{Deserialize, Serialize};

/// Server-reported metadata for one stored file.
///
/// The server sends more fields (mime type, storage path, timestamps); only
/// the ones the client renders are kept, unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: i64,
    pub original_filename: String,
    pub file_size: u64,
}

/// Payload of a successful `POST /register`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    pub id: i64,
    #[serde(default)]
    pub message: String,
}

/// Payload of a successful `POST /upload`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub id: i64,
    pub filename: String,
    pub size: u64,
    pub url: String,
}

/// `POST /login` response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub token: String,
}

/// `GET /files` response envelope. A missing `files` field means an empty
/// collection, matching the server's omission on fresh accounts.
#[derive(Debug, Deserialize)]
pub(crate) struct FilesResponse {
    #[serde(default)]
    pub files: Vec<FileRecord>,
}

/// `GET /share/{id}` response envelope. The URL may be relative to the API
/// origin; resolution happens in the client.
#[derive(Debug, Deserialize)]
pub(crate) struct ShareResponse {
    pub url: String,
}
