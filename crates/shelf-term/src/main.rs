use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use shelf_client::FsSessionStore;
use shelf_client::HttpShelfClient;
use shelf_client::MemorySessionStore;
use shelf_client::SessionStore;
use shelf_client::ShelfApi;
use shelf_term::application::cli;
use shelf_term::application::ui;
use shelf_term::configuration::Config;
use shelf_term::configuration::ConfigKey;
use shelf_term::domain::models::Action;
use shelf_term::domain::models::Event;
use shelf_term::domain::services::ActionsService;
use shelf_term::domain::services::AppState;
use shelf_term::domain::services::AppStateProps;
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// The TUI owns stdout, so logs go to a file under the cache directory.
/// The returned guard must stay alive for the process lifetime.
fn init_logging() -> Result<WorkerGuard> {
    let dir = dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("shelf");
    std::fs::create_dir_all(&dir)?;

    let appender = tracing_appender::rolling::never(dir, "shelf.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("SHELF_LOG").unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(writer)
        .with_ansi(false)
        .init();

    return Ok(guard);
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli::build().get_matches();

    if let Some(("config", _)) = matches.subcommand() {
        println!("{}", Config::serialize_default(cli::build()));
        return Ok(());
    }

    let _log_guard = init_logging()?;
    Config::load(vec![&matches]).await?;

    std::panic::set_hook(Box::new(|panic_info| {
        ui::destruct_terminal_for_panic();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let session: Arc<dyn SessionStore> = if matches.get_flag("ephemeral") {
        Arc::new(MemorySessionStore::new())
    } else {
        Arc::new(FsSessionStore::new(PathBuf::from(Config::get(
            ConfigKey::SessionFile,
        ))))
    };

    let api: Arc<dyn ShelfApi> = Arc::new(HttpShelfClient::new(
        &Config::get(ConfigKey::ApiUrl),
        session.clone(),
    ));

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

    let actions_api = api.clone();
    let actions_session = session.clone();
    let download_dir = PathBuf::from(Config::get(ConfigKey::DownloadDir));
    tokio::spawn(async move {
        if let Err(err) = ActionsService::start(
            actions_api,
            actions_session,
            download_dir,
            event_tx,
            &mut action_rx,
        )
        .await
        {
            tracing::error!(error = ?err, "actions service stopped");
        }
    });

    // A persisted session starts straight in the file manager; render fresh
    // server state immediately.
    if session.is_authenticated() {
        action_tx.send(Action::RefreshFiles { search: None })?;
    }

    let state = AppState::new(AppStateProps { session });

    return ui::start_loop(state, action_tx, event_rx).await;
}
