use anyhow::Result;
use arboard::Clipboard;

pub struct ClipboardService {}

impl ClipboardService {
    pub fn set(text: String) -> Result<()> {
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(text)?;

        return Ok(());
    }
}
