//! System clipboard access using the arboard crate

use crate::error::Result;
use crate::session::Clipboard;
use log::debug;

/// The platform clipboard. A fresh handle is opened for every copy.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new()?;
        clipboard.set_text(text)?;
        debug!("Copied {} bytes to the clipboard", text.len());
        Ok(())
    }
}
