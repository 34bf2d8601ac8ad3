use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use shelf_client::ClientError;
use shelf_client::SessionStore;
use shelf_client::ShelfApi;
use tokio::sync::mpsc;

use super::clipboard::ClipboardService;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::Notice;

type ApiArc = Arc<dyn ShelfApi>;

/// Convert a settled failure into exactly one notice. Guard violations stay
/// silent: the UI is already showing the logged-out state, so there is
/// nothing to report.
fn settle_error(err: ClientError, event_tx: &mpsc::UnboundedSender<Event>) -> Result<()> {
    if err.is_guard() {
        return Ok(());
    }

    event_tx.send(Event::BackendNotice(Notice::error(&err.to_string())))?;

    return Ok(());
}

async fn refresh_files(
    api: &ApiArc,
    search: Option<String>,
    event_tx: &mpsc::UnboundedSender<Event>,
) -> Result<()> {
    match api.list_files(search.as_deref()).await {
        Ok(files) => {
            event_tx.send(Event::FilesLoaded(files))?;
        }
        Err(err) => settle_error(err, event_tx)?,
    }

    return Ok(());
}

async fn login(
    api: &ApiArc,
    email: String,
    password: String,
    event_tx: &mpsc::UnboundedSender<Event>,
) -> Result<()> {
    match api.login(&email, &password).await {
        Ok(()) => {
            event_tx.send(Event::SessionChanged)?;
            event_tx.send(Event::BackendNotice(Notice::info("Login successful!")))?;
            // Entering the logged-in state renders fresh server state
            // immediately.
            refresh_files(api, None, event_tx).await?;
        }
        Err(err) => settle_error(err, event_tx)?,
    }

    return Ok(());
}

async fn register(
    api: &ApiArc,
    email: String,
    password: String,
    event_tx: &mpsc::UnboundedSender<Event>,
) -> Result<()> {
    match api.register(&email, &password).await {
        Ok(_) => {
            event_tx.send(Event::BackendNotice(Notice::info(
                "Registration successful! Please login.",
            )))?;
        }
        Err(err) => settle_error(err, event_tx)?,
    }

    return Ok(());
}

async fn upload_file(
    api: &ApiArc,
    path: PathBuf,
    event_tx: &mpsc::UnboundedSender<Event>,
) -> Result<()> {
    match api.upload(&path).await {
        Ok(_) => {
            event_tx.send(Event::BackendNotice(Notice::info(
                "File uploaded successfully!",
            )))?;
            // The server response is the sole source of truth after a
            // mutation: refetch, never patch locally.
            refresh_files(api, None, event_tx).await?;
        }
        Err(err) => settle_error(err, event_tx)?,
    }

    return Ok(());
}

async fn delete_file(
    api: &ApiArc,
    id: i64,
    event_tx: &mpsc::UnboundedSender<Event>,
) -> Result<()> {
    match api.delete_file(id).await {
        Ok(()) => {
            event_tx.send(Event::BackendNotice(Notice::info(
                "File deleted successfully!",
            )))?;
            refresh_files(api, None, event_tx).await?;
        }
        Err(err) => settle_error(err, event_tx)?,
    }

    return Ok(());
}

async fn share_file(api: &ApiArc, id: i64, event_tx: &mpsc::UnboundedSender<Event>) -> Result<()> {
    match api.share_link(id).await {
        Ok(url) => {
            if let Err(err) = ClipboardService::set(url) {
                event_tx.send(Event::BackendNotice(Notice::error(&format!(
                    "Failed to copy to clipboard: {err}"
                ))))?;
                return Ok(());
            }

            event_tx.send(Event::BackendNotice(Notice::info(
                "Share link copied to clipboard!",
            )))?;
        }
        Err(err) => settle_error(err, event_tx)?,
    }

    return Ok(());
}

async fn download_file(
    api: &ApiArc,
    id: i64,
    filename: String,
    download_dir: &Path,
    event_tx: &mpsc::UnboundedSender<Event>,
) -> Result<()> {
    // Download is the one guarded action that warns instead of silently
    // declining when no session is present.
    if let Err(err) = api.download_url(id) {
        if err.is_guard() {
            event_tx.send(Event::BackendNotice(Notice::error(
                "Please log in to download files.",
            )))?;
            return Ok(());
        }

        return settle_error(err, event_tx);
    }

    let dest = download_dir.join(filename);
    match api.download(id, &dest).await {
        Ok(written) => {
            event_tx.send(Event::BackendNotice(Notice::info(&format!(
                "Saved to {}",
                written.display()
            ))))?;
        }
        Err(err) => settle_error(err, event_tx)?,
    }

    return Ok(());
}

pub struct ActionsService {}

impl ActionsService {
    pub async fn start(
        api: Arc<dyn ShelfApi>,
        session: Arc<dyn SessionStore>,
        download_dir: PathBuf,
        event_tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        loop {
            if let Some(action) = rx.recv().await {
                let worker_api = api.clone();
                let worker_event_tx = event_tx.clone();

                match action {
                    Action::Logout => {
                        // Logout is local: clear the persisted session and
                        // let the UI derive the logged-out screen from it.
                        session.clear();
                        event_tx.send(Event::SessionChanged)?;
                        event_tx.send(Event::BackendNotice(Notice::info(
                            "Logged out successfully!",
                        )))?;
                    }
                    Action::Login { email, password } => {
                        tokio::spawn(async move {
                            if let Err(err) =
                                login(&worker_api, email, password, &worker_event_tx).await
                            {
                                tracing::error!(error = ?err, "login worker failed");
                            }
                        });
                    }
                    Action::Register { email, password } => {
                        tokio::spawn(async move {
                            if let Err(err) =
                                register(&worker_api, email, password, &worker_event_tx).await
                            {
                                tracing::error!(error = ?err, "register worker failed");
                            }
                        });
                    }
                    Action::RefreshFiles { search } => {
                        tokio::spawn(async move {
                            if let Err(err) =
                                refresh_files(&worker_api, search, &worker_event_tx).await
                            {
                                tracing::error!(error = ?err, "refresh worker failed");
                            }
                        });
                    }
                    Action::UploadFile(path) => {
                        tokio::spawn(async move {
                            if let Err(err) =
                                upload_file(&worker_api, path, &worker_event_tx).await
                            {
                                tracing::error!(error = ?err, "upload worker failed");
                            }
                        });
                    }
                    Action::DeleteFile(id) => {
                        tokio::spawn(async move {
                            if let Err(err) = delete_file(&worker_api, id, &worker_event_tx).await
                            {
                                tracing::error!(error = ?err, "delete worker failed");
                            }
                        });
                    }
                    Action::ShareFile(id) => {
                        tokio::spawn(async move {
                            if let Err(err) = share_file(&worker_api, id, &worker_event_tx).await {
                                tracing::error!(error = ?err, "share worker failed");
                            }
                        });
                    }
                    Action::DownloadFile { id, filename } => {
                        let worker_download_dir = download_dir.clone();
                        tokio::spawn(async move {
                            if let Err(err) = download_file(
                                &worker_api,
                                id,
                                filename,
                                &worker_download_dir,
                                &worker_event_tx,
                            )
                            .await
                            {
                                tracing::error!(error = ?err, "download worker failed");
                            }
                        });
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use shelf_client::{FileRecord, MemorySessionStore, RegisterResponse, UploadResponse};

    #[derive(Default)]
    struct MockShelfApi {
        calls: Mutex<Vec<String>>,
        fail_login: bool,
        guard_everything: bool,
    }

    impl MockShelfApi {
        fn calls(&self) -> Vec<String> {
            return self.calls.lock().unwrap().clone();
        }

        fn record(&self, call: &str) {
            self.calls.lock().unwrap().push(call.to_string());
        }
    }

    #[async_trait]
    impl ShelfApi for MockShelfApi {
        async fn register(
            &self,
            _email: &str,
            _password: &str,
        ) -> Result<RegisterResponse, ClientError> {
            self.record("register");
            return Ok(RegisterResponse {
                id: 1,
                message: "User registered successfully".to_string(),
            });
        }

        async fn login(&self, _email: &str, _password: &str) -> Result<(), ClientError> {
            self.record("login");
            if self.fail_login {
                return Err(ClientError::Remote("bad credentials".to_string()));
            }
            return Ok(());
        }

        async fn list_files(&self, _search: Option<&str>) -> Result<Vec<FileRecord>, ClientError> {
            self.record("list_files");
            if self.guard_everything {
                return Err(ClientError::NotAuthenticated);
            }
            return Ok(vec![FileRecord {
                id: 1,
                original_filename: "a.txt".to_string(),
                file_size: 500,
            }]);
        }

        async fn upload(&self, _path: &Path) -> Result<UploadResponse, ClientError> {
            self.record("upload");
            return Ok(UploadResponse {
                id: 2,
                filename: "a.txt".to_string(),
                size: 500,
                url: "/files/2".to_string(),
            });
        }

        async fn delete_file(&self, _id: i64) -> Result<(), ClientError> {
            self.record("delete_file");
            return Ok(());
        }

        async fn share_link(&self, _id: i64) -> Result<String, ClientError> {
            self.record("share_link");
            return Ok("http://localhost:8080/files/1".to_string());
        }

        fn download_url(&self, id: i64) -> Result<String, ClientError> {
            self.record("download_url");
            if self.guard_everything {
                return Err(ClientError::NotAuthenticated);
            }
            return Ok(format!("http://localhost:8080/files/{id}"));
        }

        async fn download(&self, _id: i64, dest: &Path) -> Result<PathBuf, ClientError> {
            self.record("download");
            return Ok(dest.to_path_buf());
        }
    }

    fn start_service(api: Arc<MockShelfApi>) -> (
        mpsc::UnboundedSender<Action>,
        mpsc::UnboundedReceiver<Event>,
    ) {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
        let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();
        let session = Arc::new(MemorySessionStore::new());

        tokio::spawn(async move {
            ActionsService::start(api, session, PathBuf::from("/tmp"), event_tx, &mut action_rx)
                .await
                .unwrap();
        });

        return (action_tx, event_rx);
    }

    async fn next_event(rx: &mut mpsc::UnboundedReceiver<Event>) -> Event {
        return tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("timed out waiting for event")
            .expect("event channel closed");
    }

    #[tokio::test]
    async fn test_upload_settles_then_refreshes_exactly_once() {
        let api = Arc::new(MockShelfApi::default());
        let (action_tx, mut event_rx) = start_service(api.clone());

        action_tx
            .send(Action::UploadFile(PathBuf::from("/tmp/a.txt")))
            .unwrap();

        let notice = next_event(&mut event_rx).await;
        assert!(matches!(
            notice,
            Event::BackendNotice(ref n) if n.text == "File uploaded successfully!"
        ));

        let loaded = next_event(&mut event_rx).await;
        match loaded {
            Event::FilesLoaded(files) => assert_eq!(files.len(), 1),
            other => panic!("expected FilesLoaded, got {other:?}"),
        }

        // The refresh began only after the mutation settled.
        assert_eq!(api.calls(), vec!["upload", "list_files"]);
    }

    #[tokio::test]
    async fn test_delete_settles_then_refreshes_exactly_once() {
        let api = Arc::new(MockShelfApi::default());
        let (action_tx, mut event_rx) = start_service(api.clone());

        action_tx.send(Action::DeleteFile(1)).unwrap();

        next_event(&mut event_rx).await;
        next_event(&mut event_rx).await;
        assert_eq!(api.calls(), vec!["delete_file", "list_files"]);
    }

    #[tokio::test]
    async fn test_failed_login_produces_single_error_notice_and_no_session_change() {
        let api = Arc::new(MockShelfApi {
            fail_login: true,
            ..MockShelfApi::default()
        });
        let (action_tx, mut event_rx) = start_service(api.clone());

        action_tx
            .send(Action::Login {
                email: "user@example.com".to_string(),
                password: "nope".to_string(),
            })
            .unwrap();

        let event = next_event(&mut event_rx).await;
        match event {
            Event::BackendNotice(notice) => {
                assert!(notice.is_error);
                assert!(notice.text.contains("bad credentials"));
            }
            other => panic!("expected error notice, got {other:?}"),
        }

        // No SessionChanged, no refresh.
        let silence = tokio::time::timeout(Duration::from_millis(100), event_rx.recv()).await;
        assert!(silence.is_err());
        assert_eq!(api.calls(), vec!["login"]);
    }

    #[tokio::test]
    async fn test_successful_login_announces_session_then_refreshes() {
        let api = Arc::new(MockShelfApi::default());
        let (action_tx, mut event_rx) = start_service(api.clone());

        action_tx
            .send(Action::Login {
                email: "user@example.com".to_string(),
                password: "password123".to_string(),
            })
            .unwrap();

        assert!(matches!(
            next_event(&mut event_rx).await,
            Event::SessionChanged
        ));
        assert!(matches!(
            next_event(&mut event_rx).await,
            Event::BackendNotice(ref n) if !n.is_error
        ));
        assert!(matches!(
            next_event(&mut event_rx).await,
            Event::FilesLoaded(_)
        ));
        assert_eq!(api.calls(), vec!["login", "list_files"]);
    }

    #[tokio::test]
    async fn test_guarded_refresh_stays_silent() {
        let api = Arc::new(MockShelfApi {
            guard_everything: true,
            ..MockShelfApi::default()
        });
        let (action_tx, mut event_rx) = start_service(api.clone());

        action_tx
            .send(Action::RefreshFiles { search: None })
            .unwrap();

        let silence = tokio::time::timeout(Duration::from_millis(100), event_rx.recv()).await;
        assert!(silence.is_err());
    }

    #[tokio::test]
    async fn test_guarded_download_warns_visibly() {
        let api = Arc::new(MockShelfApi {
            guard_everything: true,
            ..MockShelfApi::default()
        });
        let (action_tx, mut event_rx) = start_service(api.clone());

        action_tx
            .send(Action::DownloadFile {
                id: 1,
                filename: "a.txt".to_string(),
            })
            .unwrap();

        let event = next_event(&mut event_rx).await;
        match event {
            Event::BackendNotice(notice) => {
                assert!(notice.is_error);
                assert_eq!(notice.text, "Please log in to download files.");
            }
            other => panic!("expected warning notice, got {other:?}"),
        }

        // The guard fired before any transfer was attempted.
        assert_eq!(api.calls(), vec!["download_url"]);
    }

    #[tokio::test]
    async fn test_logout_is_local_and_immediate() {
        let api = Arc::new(MockShelfApi::default());
        let (action_tx, mut event_rx) = start_service(api.clone());

        action_tx.send(Action::Logout).unwrap();

        assert!(matches!(
            next_event(&mut event_rx).await,
            Event::SessionChanged
        ));
        assert!(matches!(
            next_event(&mut event_rx).await,
            Event::BackendNotice(ref n) if n.text == "Logged out successfully!"
        ));
        assert!(api.calls().is_empty());
    }
}
