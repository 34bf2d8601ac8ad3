use thiserror::Error;

/// Failure classification for remote operations.
///
/// `Transport` means no response reached the client at all; `Remote` means
/// the server answered with a failure status or an `error` body field;
/// `NotAuthenticated` is the client-side guard for operations that require a
/// session and is raised before any request is built.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{}", transport_message(.0))]
    Transport(#[from] reqwest::Error),
    #[error("{0}")]
    Remote(String),
    #[error("not logged in")]
    NotAuthenticated,
    #[error("file access failed: {0}")]
    Io(#[from] std::io::Error),
}

fn transport_message(err: &reqwest::Error) -> String {
    format!("could not reach the server: {err}")
}

impl ClientError {
    /// True when the failure is the silent authentication guard rather than
    /// a settled request.
    pub fn is_guard(&self) -> bool {
        matches!(self, ClientError::NotAuthenticated)
    }
}
