pub mod actions;
pub mod app_state;
pub mod clipboard;
pub mod events;
pub mod notify;

pub use actions::ActionsService;
pub use app_state::{AppState, AppStateProps, AuthField, AuthMode, PromptKind, Screen};
pub use clipboard::ClipboardService;
pub use events::EventsService;
pub use notify::Notifier;
