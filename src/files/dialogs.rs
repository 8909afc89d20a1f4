//! Native dialog integration using the rfd crate
//!
//! Implements the session's [`PathPicker`] and [`Prompter`] with native
//! file pickers and message boxes.

use crate::session::{Answer, OneOfThree, PathPicker, Prompter};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use std::path::PathBuf;

/// File extension filters for supported file types.
const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown", "mdown", "mkd", "mkdn"];
const TEXT_EXTENSIONS: &[&str] = &["txt", "text"];
const HTML_EXTENSIONS: &[&str] = &["html", "htm"];

// ─────────────────────────────────────────────────────────────────────────────
// File Pickers
// ─────────────────────────────────────────────────────────────────────────────

/// Native open/save dialogs that start in the last used directory.
#[derive(Debug, Default)]
pub struct RfdPathPicker {
    last_dir: Option<PathBuf>,
}

impl RfdPathPicker {
    pub fn new() -> Self {
        Self::default()
    }

    fn dialog(&self, title: &str) -> FileDialog {
        self.in_last_dir(
            FileDialog::new()
                .set_title(title)
                .add_filter("Markdown Files", MARKDOWN_EXTENSIONS)
                .add_filter("Text Files", TEXT_EXTENSIONS)
                .add_filter("All Files", &["*"]),
        )
    }

    fn in_last_dir(&self, dialog: FileDialog) -> FileDialog {
        match &self.last_dir {
            Some(dir) => dialog.set_directory(dir),
            None => dialog,
        }
    }

    fn remember(&mut self, picked: &Option<PathBuf>) {
        if let Some(parent) = picked.as_deref().and_then(|p| p.parent()) {
            self.last_dir = Some(parent.to_path_buf());
        }
    }
}

impl PathPicker for RfdPathPicker {
    fn pick_open_path(&mut self) -> Option<PathBuf> {
        let picked = self.dialog("Open File").pick_file();
        self.remember(&picked);
        picked
    }

    fn pick_save_path(&mut self, suggested_name: &str) -> Option<PathBuf> {
        let picked = self
            .dialog("Save File")
            .set_file_name(suggested_name)
            .save_file();
        self.remember(&picked);
        picked
    }

    fn pick_export_path(&mut self, suggested_name: &str) -> Option<PathBuf> {
        let picked = self
            .in_last_dir(
                FileDialog::new()
                    .set_title("Export as HTML")
                    .add_filter("HTML Files", HTML_EXTENSIONS)
                    .add_filter("All Files", &["*"]),
            )
            .set_file_name(suggested_name)
            .save_file();
        self.remember(&picked);
        picked
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Message Boxes
// ─────────────────────────────────────────────────────────────────────────────

/// Native message boxes titled with the application name.
#[derive(Debug, Default)]
pub struct RfdPrompter;

impl RfdPrompter {
    fn yes_no_cancel(description: &str) -> MessageDialogResult {
        MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title(crate::APP_NAME)
            .set_description(description)
            .set_buttons(MessageButtons::YesNoCancel)
            .show()
    }
}

impl Prompter for RfdPrompter {
    fn ask_yes_no_cancel(&mut self, message: &str) -> Answer {
        match Self::yes_no_cancel(message) {
            MessageDialogResult::Yes => Answer::Yes,
            MessageDialogResult::No => Answer::No,
            _ => Answer::Cancel,
        }
    }

    /// Native message boxes only offer fixed buttons, so the three options
    /// are spelled out in the text and mapped onto Yes, No and Cancel.
    fn ask_one_of_three(&mut self, message: &str, options: [&str; 3]) -> OneOfThree {
        let description = format!(
            "{}\n\nYes: {}\nNo: {}\nCancel: {}",
            message, options[0], options[1], options[2]
        );
        match Self::yes_no_cancel(&description) {
            MessageDialogResult::Yes => OneOfThree::First,
            MessageDialogResult::No => OneOfThree::Second,
            _ => OneOfThree::Third,
        }
    }

    fn show_error(&mut self, message: &str) {
        MessageDialog::new()
            .set_level(MessageLevel::Error)
            .set_title(crate::APP_NAME)
            .set_description(message)
            .set_buttons(MessageButtons::Ok)
            .show();
    }
}
