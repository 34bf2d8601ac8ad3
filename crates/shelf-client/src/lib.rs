//! Client SDK for the shelf file-hosting service
//!
//! This crate wraps the remote REST API behind a single async trait so that
//! applications can swap the HTTP implementation for a mock at the same seam.
//! The client owns the authentication-token lifecycle: a [`SessionStore`]
//! supplies the bearer token for authenticated operations, and a successful
//! login writes the new session back through it. Authenticated operations
//! attempted without a session fail with [`ClientError::NotAuthenticated`]
//! before any request is issued, so a logged-out client generates no network
//! traffic the server would only reject.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

pub mod error;
pub mod http_client;
pub mod session;
pub mod types;

pub use error::ClientError;
pub use http_client::HttpShelfClient;
pub use session::{FsSessionStore, MemorySessionStore, Session, SessionStore};
pub use types::*;

/// ShelfApi trait for communicating with a shelf server
#[async_trait]
pub trait ShelfApi: Send + Sync {
    /// Create a new account. Does not log the user in.
    async fn register(&self, email: &str, password: &str) -> Result<RegisterResponse, ClientError>;

    /// Exchange credentials for a bearer token and persist the session.
    async fn login(&self, email: &str, password: &str) -> Result<(), ClientError>;

    /// List the user's files, optionally filtered by a name search.
    async fn list_files(&self, search: Option<&str>) -> Result<Vec<FileRecord>, ClientError>;

    /// Upload a local file as the multipart field `file`.
    async fn upload(&self, path: &Path) -> Result<UploadResponse, ClientError>;

    /// Delete a stored file by id.
    async fn delete_file(&self, id: i64) -> Result<(), ClientError>;

    /// Make a file public and return its absolute share URL.
    async fn share_link(&self, id: i64) -> Result<String, ClientError>;

    /// Direct URL for opening a file. Builds no request itself.
    fn download_url(&self, id: i64) -> Result<String, ClientError>;

    /// Fetch a file's content into `dest` and return the written path.
    async fn download(&self, id: i64, dest: &Path) -> Result<PathBuf, ClientError>;
}
