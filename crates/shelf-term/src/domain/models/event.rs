use shelf_client::FileRecord;
use tui_textarea::Input;

use super::Notice;

#[derive(Debug)]
pub enum Event {
    BackendNotice(Notice),
    FilesLoaded(Vec<FileRecord>),
    SessionChanged,
    KeyboardCharInput(Input),
    KeyboardCTRLC,
    KeyboardCTRLT,
    KeyboardEnter,
    KeyboardEsc,
    KeyboardPaste(String),
    KeyboardTab,
    UITick,
    UIListUp,
    UIListDown,
}
