//! Terminal user interface for the shelf file-hosting service.
//!
//! This crate provides a terminal-based file manager over a remote shelf
//! server: account registration and login, browsing and searching stored
//! files, upload, download, delete, and share-link generation. It is the
//! user-facing component; all wire concerns live in `shelf-client`.

pub mod application;
pub mod configuration;
pub mod domain;

pub use application::ui::{destruct_terminal_for_panic, start_loop};
pub use configuration::{Config, ConfigKey};
pub use domain::models::{Action, Event, Notice};
pub use domain::services::{ActionsService, AppState, AppStateProps, EventsService};
