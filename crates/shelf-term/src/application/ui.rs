use std::io;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use crossterm::cursor::Show;
use crossterm::execute;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Alignment;
use ratatui::layout::Constraint;
use ratatui::layout::Direction;
use ratatui::layout::Layout;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::List;
use ratatui::widgets::ListItem;
use ratatui::widgets::ListState;
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use ratatui::Terminal;
use shelf_client::FileRecord;
use tokio::sync::mpsc;
use tui_textarea::Key;

use crate::domain::models::humanize_size;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::Notice;
use crate::domain::services::AppState;
use crate::domain::services::AuthField;
use crate::domain::services::AuthMode;
use crate::domain::services::EventsService;
use crate::domain::services::PromptKind;
use crate::domain::services::Screen;

const EMPTY_FILES_TEXT: &str = "No files uploaded yet.";
const LOADING_FILES_TEXT: &str = "Loading files...";
const LOGGED_IN_HELP: &str =
    "up/down select | r refresh | / search | u upload | d download | s share | x delete | l logout | q quit";
const LOGGED_OUT_HELP: &str = "Tab switch field | Ctrl+T switch mode | Enter submit | Ctrl+C quit";
const PROMPT_HELP: &str = "Enter submit | Esc cancel";

/// Restores the terminal without a Terminal handle. Installed in the panic
/// hook so a crash never leaves the user's shell in raw mode.
pub fn destruct_terminal_for_panic() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
}

/// Placeholder text for the file panel, distinguishing "not yet loaded"
/// from an explicit zero-file listing.
fn files_placeholder(files: &Option<Vec<FileRecord>>) -> Option<&'static str> {
    match files {
        None => Some(LOADING_FILES_TEXT),
        Some(files) if files.is_empty() => Some(EMPTY_FILES_TEXT),
        Some(_) => None,
    }
}

fn file_line(record: &FileRecord) -> String {
    return format!(
        "{}  ({})",
        record.original_filename,
        humanize_size(record.file_size)
    );
}

fn draw_notice(frame: &mut Frame<'_>, area: Rect, notice: Option<&Notice>) {
    let Some(notice) = notice else {
        return;
    };

    let style = if notice.is_error {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };
    frame.render_widget(Paragraph::new(notice.text.clone()).style(style), area);
}

fn draw_logged_out(frame: &mut Frame<'_>, area: Rect, state: &mut AppState<'_>) {
    let title = match state.auth_mode {
        AuthMode::Login => "Log in",
        AuthMode::Register => "Register",
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(title).style(Style::default().add_modifier(Modifier::BOLD)),
        rows[0],
    );

    let focused = Style::default().fg(Color::Cyan);
    let blurred = Style::default().fg(Color::DarkGray);

    let email_border = if state.auth_field == AuthField::Email {
        focused
    } else {
        blurred
    };
    state.email_input.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(email_border)
            .title("Email"),
    );
    frame.render_widget(&state.email_input, rows[1]);

    let password_border = if state.auth_field == AuthField::Password {
        focused
    } else {
        blurred
    };
    state.password_input.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(password_border)
            .title("Password"),
    );
    frame.render_widget(&state.password_input, rows[2]);
}

fn draw_logged_in(frame: &mut Frame<'_>, area: Rect, state: &mut AppState<'_>) {
    let header_text = match state.session.email() {
        Some(email) => format!("Logged in as {email}"),
        None => "Logged in".to_string(),
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(header_text).style(Style::default().add_modifier(Modifier::BOLD)),
        rows[0],
    );

    if let Some(placeholder) = files_placeholder(&state.files) {
        frame.render_widget(Paragraph::new(placeholder), rows[1]);
    } else {
        let items = state
            .files
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|record| return ListItem::new(file_line(record)))
            .collect::<Vec<ListItem>>();

        let list = List::new(items)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut list_state = ListState::default().with_selected(Some(state.selected));
        frame.render_stateful_widget(list, rows[1], &mut list_state);
    }

    if let Some(kind) = state.prompt {
        let title = match kind {
            PromptKind::UploadPath => "Upload: path of the file to send",
            PromptKind::Search => "Search files by name (empty shows all)",
        };
        state.prompt_input.set_block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(title),
        );
        frame.render_widget(&state.prompt_input, rows[2]);
    }
}

fn draw(frame: &mut Frame<'_>, state: &mut AppState<'_>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    frame.render_widget(
        Paragraph::new("shelf").alignment(Alignment::Center),
        rows[0],
    );

    match state.screen() {
        Screen::LoggedOut => draw_logged_out(frame, rows[1], state),
        Screen::LoggedIn => draw_logged_in(frame, rows[1], state),
    }

    draw_notice(frame, rows[2], state.notifier.current(Instant::now()));

    let help = match (state.screen(), state.prompt) {
        (Screen::LoggedOut, _) => LOGGED_OUT_HELP,
        (Screen::LoggedIn, Some(_)) => PROMPT_HELP,
        (Screen::LoggedIn, None) => LOGGED_IN_HELP,
    };
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        rows[3],
    );
}

/// Submit the auth form for the current mode. Empty fields are rejected
/// locally so the backend never sees a request that is guaranteed to fail.
fn submit_auth_form(state: &mut AppState<'_>, action_tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
    let email = state.email();
    let password = state.password();

    if email.is_empty() || password.is_empty() {
        state.notify(Notice::error("Email and password are required."));
        return Ok(());
    }

    let action = match state.auth_mode {
        AuthMode::Login => Action::Login { email, password },
        AuthMode::Register => Action::Register { email, password },
    };
    action_tx.send(action)?;

    return Ok(());
}

fn submit_prompt(state: &mut AppState<'_>, action_tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
    let Some(kind) = state.prompt else {
        return Ok(());
    };

    let value = state.prompt_value();
    match kind {
        PromptKind::UploadPath => {
            if !value.is_empty() {
                action_tx.send(Action::UploadFile(PathBuf::from(value)))?;
            }
        }
        PromptKind::Search => {
            let search = if value.is_empty() { None } else { Some(value) };
            action_tx.send(Action::RefreshFiles { search })?;
        }
    }
    state.close_prompt();

    return Ok(());
}

/// Key bindings for the file manager screen. Returns true when the user
/// asked to quit.
fn handle_logged_in_key(
    state: &mut AppState<'_>,
    key: Key,
    action_tx: &mpsc::UnboundedSender<Action>,
) -> Result<bool> {
    match key {
        Key::Char('q') => return Ok(true),
        Key::Char('r') => {
            action_tx.send(Action::RefreshFiles { search: None })?;
        }
        Key::Char('/') => {
            state.open_prompt(PromptKind::Search);
        }
        Key::Char('u') => {
            state.open_prompt(PromptKind::UploadPath);
        }
        Key::Char('j') => state.select_next(),
        Key::Char('k') => state.select_prev(),
        Key::Char('d') => {
            if let Some(record) = state.selected_file() {
                action_tx.send(Action::DownloadFile {
                    id: record.id,
                    filename: record.original_filename.clone(),
                })?;
            }
        }
        Key::Char('s') => {
            if let Some(record) = state.selected_file() {
                action_tx.send(Action::ShareFile(record.id))?;
            }
        }
        Key::Char('x') => {
            if let Some(record) = state.selected_file() {
                action_tx.send(Action::DeleteFile(record.id))?;
            }
        }
        Key::Char('l') => {
            action_tx.send(Action::Logout)?;
        }
        _ => {}
    }

    return Ok(false);
}

pub async fn start_loop(
    mut state: AppState<'static>,
    action_tx: mpsc::UnboundedSender<Action>,
    event_rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let mut events = EventsService::new(event_rx);

    loop {
        terminal.draw(|frame| draw(frame, &mut state))?;

        let event = events.next().await?;
        match event {
            Event::UITick => {
                state.notifier.tick(Instant::now());
            }
            Event::BackendNotice(notice) => {
                state.notify(notice);
            }
            Event::FilesLoaded(files) => {
                state.handle_files_loaded(files);
            }
            Event::SessionChanged => {
                state.handle_session_changed();
            }
            Event::KeyboardCTRLC => {
                break;
            }
            Event::KeyboardCTRLT => {
                if state.screen() == Screen::LoggedOut {
                    state.toggle_auth_mode();
                }
            }
            Event::KeyboardTab => {
                if state.screen() == Screen::LoggedOut {
                    state.toggle_auth_field();
                }
            }
            Event::KeyboardEsc => {
                if state.prompt.is_some() {
                    state.close_prompt();
                }
            }
            Event::KeyboardEnter => match state.screen() {
                Screen::LoggedOut => submit_auth_form(&mut state, &action_tx)?,
                Screen::LoggedIn => submit_prompt(&mut state, &action_tx)?,
            },
            Event::KeyboardPaste(text) => match state.screen() {
                Screen::LoggedOut => state.paste_auth_input(&text),
                Screen::LoggedIn => {
                    if state.prompt.is_some() {
                        state.prompt_input.insert_str(&text);
                    }
                }
            },
            Event::KeyboardCharInput(input) => match state.screen() {
                Screen::LoggedOut => state.feed_auth_input(input),
                Screen::LoggedIn => {
                    if state.prompt.is_some() {
                        state.prompt_input.input(input);
                    } else if handle_logged_in_key(&mut state, input.key, &action_tx)? {
                        break;
                    }
                }
            },
            Event::UIListUp => {
                if state.screen() == Screen::LoggedIn && state.prompt.is_none() {
                    state.select_prev();
                }
            }
            Event::UIListDown => {
                if state.screen() == Screen::LoggedIn && state.prompt.is_none() {
                    state.select_next();
                }
            }
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, Show)?;
    terminal.show_cursor()?;

    return Ok(());
}
