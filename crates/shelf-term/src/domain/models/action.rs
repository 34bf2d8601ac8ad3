use std::path::PathBuf;

/// User intents, produced by the UI loop and consumed by the actions
/// service. Everything that touches the backend goes through one of these.
#[derive(Debug, Clone)]
pub enum Action {
    Register { email: String, password: String },
    Login { email: String, password: String },
    Logout,
    RefreshFiles { search: Option<String> },
    UploadFile(PathBuf),
    DeleteFile(i64),
    ShareFile(i64),
    DownloadFile { id: i64, filename: String },
}
