use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::types::{FilesResponse, LoginResponse, ShareResponse};
use crate::{ClientError, FileRecord, RegisterResponse, SessionStore, ShelfApi, UploadResponse};

/// HTTP client for a remote shelf server.
///
/// Reads the bearer token from the injected [`SessionStore`] on every
/// authenticated call and writes the session back on login. The store stays
/// the single owner of persisted credentials.
pub struct HttpShelfClient {
    base_url: String,
    client: reqwest::Client,
    session: Arc<dyn SessionStore>,
    timeout: Duration,
}

impl HttpShelfClient {
    pub fn new(base_url: &str, session: Arc<dyn SessionStore>) -> HttpShelfClient {
        HttpShelfClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            session,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> HttpShelfClient {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Guard for authenticated-only operations. Raised before any request is
    /// built, so a logged-out client issues zero network traffic.
    fn bearer(&self) -> Result<String, ClientError> {
        self.session
            .token()
            .map(|token| format!("Bearer {token}"))
            .ok_or(ClientError::NotAuthenticated)
    }

    /// The server may hand back a path relative to its own origin; callers
    /// always receive an absolute URL.
    fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            return url.to_string();
        }
        if url.starts_with('/') {
            return format!("{}{}", self.base_url, url);
        }
        format!("{}/{}", self.base_url, url)
    }
}

/// Classify a settled response: an `error` field in the body wins
/// regardless of status, then any non-2xx status fails with the
/// per-operation fallback message.
async fn parse_response<T: DeserializeOwned>(
    response: reqwest::Response,
    fallback: &str,
) -> Result<T, ClientError> {
    let status = response.status();
    let body = response.json::<Value>().await.unwrap_or(Value::Null);

    if let Some(message) = body.get("error").and_then(Value::as_str) {
        return Err(ClientError::Remote(message.to_string()));
    }

    if !status.is_success() {
        tracing::error!(status = status.as_u16(), "request failed without error body");
        return Err(ClientError::Remote(fallback.to_string()));
    }

    serde_json::from_value(body).map_err(|err| {
        tracing::error!(error = %err, "unexpected response shape");
        ClientError::Remote(fallback.to_string())
    })
}

#[async_trait]
impl ShelfApi for HttpShelfClient {
    async fn register(
        &self,
        email: &str,
        password: &str,
    ) -> Result<RegisterResponse, ClientError> {
        let response = self
            .client
            .post(self.endpoint("/register"))
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        parse_response(response, "Registration failed").await
    }

    async fn login(&self, email: &str, password: &str) -> Result<(), ClientError> {
        let response = self
            .client
            .post(self.endpoint("/login"))
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let payload: LoginResponse = parse_response(response, "Login failed").await?;
        self.session.set(&payload.token, email);

        Ok(())
    }

    async fn list_files(&self, search: Option<&str>) -> Result<Vec<FileRecord>, ClientError> {
        let bearer = self.bearer()?;

        let mut request = self
            .client
            .get(self.endpoint("/files"))
            .header("Authorization", bearer)
            .timeout(self.timeout);

        if let Some(query) = search {
            request = request.query(&[("search", query)]);
        }

        let response = request.send().await?;
        let payload: FilesResponse = parse_response(response, "Failed to fetch files").await?;

        Ok(payload.files)
    }

    async fn upload(&self, path: &Path) -> Result<UploadResponse, ClientError> {
        let bearer = self.bearer()?;

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "upload path has no file name",
                )
            })?;
        let bytes = tokio::fs::read(path).await?;

        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename);
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.endpoint("/upload"))
            .header("Authorization", bearer)
            .timeout(self.timeout)
            .multipart(form)
            .send()
            .await?;

        parse_response(response, "Upload failed").await
    }

    async fn delete_file(&self, id: i64) -> Result<(), ClientError> {
        let bearer = self.bearer()?;

        let response = self
            .client
            .delete(self.endpoint(&format!("/files/{id}")))
            .header("Authorization", bearer)
            .timeout(self.timeout)
            .send()
            .await?;

        let _: Value = parse_response(response, "Delete failed").await?;

        Ok(())
    }

    async fn share_link(&self, id: i64) -> Result<String, ClientError> {
        let bearer = self.bearer()?;

        let response = self
            .client
            .get(self.endpoint(&format!("/share/{id}")))
            .header("Authorization", bearer)
            .timeout(self.timeout)
            .send()
            .await?;

        let payload: ShareResponse = parse_response(response, "Share failed").await?;

        Ok(self.resolve(&payload.url))
    }

    fn download_url(&self, id: i64) -> Result<String, ClientError> {
        self.bearer()?;

        Ok(self.endpoint(&format!("/files/{id}")))
    }

    async fn download(&self, id: i64, dest: &Path) -> Result<PathBuf, ClientError> {
        let bearer = self.bearer()?;
        let url = self.download_url(id)?;

        let response = self
            .client
            .get(url)
            .header("Authorization", bearer)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            // Failure bodies are JSON even on the byte-serving endpoint.
            return match parse_response::<Value>(response, "Download failed").await {
                Err(err) => Err(err),
                Ok(_) => Err(ClientError::Remote("Download failed".to_string())),
            };
        }

        let bytes = response.bytes().await?;
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(dest, &bytes).await?;

        Ok(dest.to_path_buf())
    }
}
