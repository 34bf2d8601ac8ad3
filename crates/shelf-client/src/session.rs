use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// The authenticated identity of the running client.
///
/// Token and email are persisted as one document so no partial session is
/// ever observable: either both are present or neither is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub email: String,
}

/// Owner of the persisted session. The HTTP client reads it for credentials
/// on every authenticated request; login and logout are its only writers.
///
/// Storage unavailability must degrade to "logged out" rather than failing:
/// implementations log and swallow storage errors, and report no session.
pub trait SessionStore: Send + Sync {
    fn set(&self, token: &str, email: &str);
    fn clear(&self);
    fn session(&self) -> Option<Session>;

    fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }

    fn token(&self) -> Option<String> {
        self.session().map(|s| s.token)
    }

    fn email(&self) -> Option<String> {
        self.session().map(|s| s.email)
    }
}

/// Session store backed by a JSON file in the platform data directory.
///
/// The file is re-read on every access rather than cached, so a session
/// removed out-of-band (or a failing disk) is observed as logged-out on the
/// next operation instead of producing stale credentials.
pub struct FsSessionStore {
    path: PathBuf,
}

impl FsSessionStore {
    pub fn new(path: PathBuf) -> FsSessionStore {
        FsSessionStore { path }
    }

    /// Default location: `<platform data dir>/shelf/session.json`.
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("shelf/session.json")
    }
}

impl SessionStore for FsSessionStore {
    fn set(&self, token: &str, email: &str) {
        let session = Session {
            token: token.to_string(),
            email: email.to_string(),
        };

        if let Some(parent) = self.path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                tracing::error!(error = %err, path = %parent.display(), "cannot create session directory");
                return;
            }
        }

        match serde_json::to_string(&session) {
            Ok(doc) => {
                if let Err(err) = fs::write(&self.path, doc) {
                    tracing::error!(error = %err, path = %self.path.display(), "cannot persist session");
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "cannot serialize session");
            }
        }
    }

    fn clear(&self) {
        if let Err(err) = fs::remove_file(&self.path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::error!(error = %err, path = %self.path.display(), "cannot remove session file");
            }
        }
    }

    fn session(&self) -> Option<Session> {
        let doc = match fs::read_to_string(&self.path) {
            Ok(doc) => doc,
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    tracing::debug!(error = %err, "session file unreadable, treating as logged out");
                }
                return None;
            }
        };

        match serde_json::from_str(&doc) {
            Ok(session) => Some(session),
            Err(err) => {
                tracing::debug!(error = %err, "session file corrupt, treating as logged out");
                None
            }
        }
    }
}

/// In-memory session store for tests and `--ephemeral` runs.
#[derive(Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> MemorySessionStore {
        MemorySessionStore::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn set(&self, token: &str, email: &str) {
        *self.session.lock().unwrap_or_else(|p| p.into_inner()) = Some(Session {
            token: token.to_string(),
            email: email.to_string(),
        });
    }

    fn clear(&self) {
        *self.session.lock().unwrap_or_else(|p| p.into_inner()) = None;
    }

    fn session(&self) -> Option<Session> {
        self.session
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}
