use std::sync::Arc;

use shelf_client::FileRecord;
use shelf_client::MemorySessionStore;
use shelf_client::SessionStore;
use tui_textarea::Input;
use tui_textarea::Key;

use super::*;

fn record(id: i64, name: &str) -> FileRecord {
    return FileRecord {
        id,
        original_filename: name.to_string(),
        file_size: 100,
    };
}

fn state_with_session(session: Arc<MemorySessionStore>) -> AppState<'static> {
    return AppState::new(AppStateProps { session });
}

#[test]
fn test_screen_is_derived_from_session_store() {
    let session = Arc::new(MemorySessionStore::new());
    let state = state_with_session(session.clone());
    assert_eq!(state.screen(), Screen::LoggedOut);

    session.set("tok", "user@example.com");
    assert_eq!(state.screen(), Screen::LoggedIn);

    session.clear();
    assert_eq!(state.screen(), Screen::LoggedOut);
}

#[test]
fn test_files_loaded_replaces_collection_and_clamps_selection() {
    let session = Arc::new(MemorySessionStore::new());
    session.set("tok", "user@example.com");
    let mut state = state_with_session(session);

    state.handle_files_loaded(vec![record(1, "a.txt"), record(2, "b.txt"), record(3, "c.txt")]);
    state.select_next();
    state.select_next();
    assert_eq!(state.selected_file().unwrap().id, 3);

    // A shorter fresh listing replaces the old one entirely.
    state.handle_files_loaded(vec![record(9, "z.txt")]);
    assert_eq!(state.files.as_ref().unwrap().len(), 1);
    assert_eq!(state.selected_file().unwrap().id, 9);
}

#[test]
fn test_selection_stays_in_bounds() {
    let session = Arc::new(MemorySessionStore::new());
    session.set("tok", "user@example.com");
    let mut state = state_with_session(session);

    state.handle_files_loaded(vec![record(1, "a.txt"), record(2, "b.txt")]);
    state.select_prev();
    assert_eq!(state.selected, 0);
    state.select_next();
    state.select_next();
    state.select_next();
    assert_eq!(state.selected, 1);
}

#[test]
fn test_logout_clears_rendered_collection() {
    let session = Arc::new(MemorySessionStore::new());
    session.set("tok", "user@example.com");
    let mut state = state_with_session(session.clone());

    state.handle_files_loaded(vec![record(1, "a.txt")]);
    state.open_prompt(PromptKind::Search);

    session.clear();
    state.handle_session_changed();

    assert_eq!(state.files, None);
    assert_eq!(state.selected, 0);
    assert_eq!(state.prompt, None);
}

#[test]
fn test_auth_inputs_route_to_focused_field() {
    let session = Arc::new(MemorySessionStore::new());
    let mut state = state_with_session(session);

    state.feed_auth_input(Input {
        key: Key::Char('a'),
        ..Input::default()
    });
    state.toggle_auth_field();
    state.feed_auth_input(Input {
        key: Key::Char('p'),
        ..Input::default()
    });

    assert_eq!(state.email(), "a");
    assert_eq!(state.password(), "p");
}

#[test]
fn test_prompt_value_round_trip() {
    let session = Arc::new(MemorySessionStore::new());
    session.set("tok", "user@example.com");
    let mut state = state_with_session(session);

    state.open_prompt(PromptKind::UploadPath);
    state.prompt_input.insert_str("/tmp/notes.txt");
    assert_eq!(state.prompt_value(), "/tmp/notes.txt");

    state.close_prompt();
    assert_eq!(state.prompt_value(), "");
}
