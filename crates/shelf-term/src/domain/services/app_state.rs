use std::sync::Arc;
use std::time::Instant;

use shelf_client::FileRecord;
use shelf_client::SessionStore;
use tui_textarea::Input;
use tui_textarea::TextArea;

use super::Notifier;
use crate::domain::models::Notice;

#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

/// The two reachable UI states. Never stored: always derived from the
/// session store, so the screen can not drift from the persisted session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    LoggedOut,
    LoggedIn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Email,
    Password,
}

/// Single-line input overlays available on the file manager screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    UploadPath,
    Search,
}

pub struct AppStateProps {
    pub session: Arc<dyn SessionStore>,
}

pub struct AppState<'a> {
    pub session: Arc<dyn SessionStore>,
    /// `None` until the first listing settles; `Some(vec![])` is the
    /// explicit "zero files" state, which renders differently.
    pub files: Option<Vec<FileRecord>>,
    pub selected: usize,
    pub notifier: Notifier,
    pub auth_mode: AuthMode,
    pub auth_field: AuthField,
    pub email_input: TextArea<'a>,
    pub password_input: TextArea<'a>,
    pub prompt: Option<PromptKind>,
    pub prompt_input: TextArea<'a>,
}

impl<'a> AppState<'a> {
    pub fn new(props: AppStateProps) -> AppState<'a> {
        let mut password_input = TextArea::default();
        password_input.set_mask_char('\u{2022}');

        return AppState {
            session: props.session,
            files: None,
            selected: 0,
            notifier: Notifier::new(),
            auth_mode: AuthMode::Login,
            auth_field: AuthField::Email,
            email_input: TextArea::default(),
            password_input,
            prompt: None,
            prompt_input: TextArea::default(),
        };
    }

    pub fn screen(&self) -> Screen {
        if self.session.is_authenticated() {
            return Screen::LoggedIn;
        }

        return Screen::LoggedOut;
    }

    pub fn handle_files_loaded(&mut self, files: Vec<FileRecord>) {
        self.selected = self.selected.min(files.len().saturating_sub(1));
        self.files = Some(files);
    }

    /// Reconcile local state after a login or logout settled. Leaving the
    /// logged-in screen discards the rendered collection entirely.
    pub fn handle_session_changed(&mut self) {
        if self.screen() == Screen::LoggedOut {
            self.files = None;
            self.selected = 0;
            self.prompt = None;
            self.prompt_input = TextArea::default();
            self.reset_auth_inputs();
        }
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notifier.notify(notice, Instant::now());
    }

    pub fn selected_file(&self) -> Option<&FileRecord> {
        return self.files.as_ref().and_then(|files| files.get(self.selected));
    }

    pub fn select_next(&mut self) {
        let len = self.files.as_ref().map(Vec::len).unwrap_or(0);
        if len > 0 && self.selected < len - 1 {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn toggle_auth_mode(&mut self) {
        self.auth_mode = match self.auth_mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
    }

    pub fn toggle_auth_field(&mut self) {
        self.auth_field = match self.auth_field {
            AuthField::Email => AuthField::Password,
            AuthField::Password => AuthField::Email,
        };
    }

    pub fn feed_auth_input(&mut self, input: Input) {
        match self.auth_field {
            AuthField::Email => self.email_input.input(input),
            AuthField::Password => self.password_input.input(input),
        };
    }

    pub fn paste_auth_input(&mut self, text: &str) {
        match self.auth_field {
            AuthField::Email => self.email_input.insert_str(text),
            AuthField::Password => self.password_input.insert_str(text),
        };
    }

    pub fn email(&self) -> String {
        return self.email_input.lines().join("");
    }

    pub fn password(&self) -> String {
        return self.password_input.lines().join("");
    }

    fn reset_auth_inputs(&mut self) {
        self.email_input = TextArea::default();
        self.password_input = TextArea::default();
        self.password_input.set_mask_char('\u{2022}');
        self.auth_field = AuthField::Email;
    }

    pub fn open_prompt(&mut self, kind: PromptKind) {
        self.prompt = Some(kind);
        self.prompt_input = TextArea::default();
    }

    pub fn close_prompt(&mut self) {
        self.prompt = None;
        self.prompt_input = TextArea::default();
    }

    pub fn prompt_value(&self) -> String {
        return self.prompt_input.lines().join("");
    }
}
