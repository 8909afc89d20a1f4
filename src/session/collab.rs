//! Boundaries between the session core and the outside world
//!
//! Rendering, file pickers, confirmation prompts, the clipboard and editor
//! notifications are all consumed through the traits in this module, so the
//! session manager never talks to the UI directly.

use crate::config::SettingsLedger;
use crate::document::Document;
use crate::drafts::DraftStore;
use crate::error::Result;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────────────────────────────────────

/// Converts document text to preview HTML.
///
/// Must be a pure function of its input.
pub trait Renderer {
    fn render(&self, markdown: &str) -> String;
}

// ─────────────────────────────────────────────────────────────────────────────
// Path Picker
// ─────────────────────────────────────────────────────────────────────────────

/// Asks the user for file locations. `None` means the user cancelled.
pub trait PathPicker {
    fn pick_open_path(&mut self) -> Option<PathBuf>;
    fn pick_save_path(&mut self, suggested_name: &str) -> Option<PathBuf>;

    /// Location for an HTML export.
    fn pick_export_path(&mut self, suggested_name: &str) -> Option<PathBuf>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Clipboard
// ─────────────────────────────────────────────────────────────────────────────

/// Receives text copied by the session.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Confirmation Prompts
// ─────────────────────────────────────────────────────────────────────────────

/// Answer to a yes/no/cancel question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    Cancel,
}

/// Answer to a question with three labelled options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OneOfThree {
    First,
    Second,
    Third,
}

/// Blocking questions and messages addressed to the user.
pub trait Prompter {
    fn ask_yes_no_cancel(&mut self, message: &str) -> Answer;

    /// `options` holds the labels of the three choices, in order.
    fn ask_one_of_three(&mut self, message: &str, options: [&str; 3]) -> OneOfThree;

    fn show_error(&mut self, message: &str);
}

// ─────────────────────────────────────────────────────────────────────────────
// Session Observer
// ─────────────────────────────────────────────────────────────────────────────

/// Notifications for whatever presents the session (usually the editor).
///
/// A tab switch always produces, in order: `on_tab_switching` for the
/// outgoing document, `on_preview_published` for the incoming one, then
/// `on_tab_switched`.
pub trait SessionObserver {
    /// The selection is about to move away from `outgoing`.
    fn on_tab_switching(&mut self, _outgoing: &Document) {}

    /// The selection has moved. `None` when no document is open.
    fn on_tab_switched(&mut self, _incoming: Option<&Document>) {}

    /// The current document's content was replaced by the session itself
    /// (undo, redo, revert) and the editor should reload it.
    fn on_content_reloaded(&mut self, _document: &Document) {}

    /// Fresh preview HTML for the current document.
    fn on_preview_published(&mut self, _html: &str) {}
}

// ─────────────────────────────────────────────────────────────────────────────
// Service Bundle
// ─────────────────────────────────────────────────────────────────────────────

/// Everything the session manager talks to besides its own state.
pub struct Services {
    pub ledger: Box<dyn SettingsLedger>,
    pub drafts: DraftStore,
    pub renderer: Box<dyn Renderer>,
    pub picker: Box<dyn PathPicker>,
    pub prompter: Box<dyn Prompter>,
    pub observer: Box<dyn SessionObserver>,
    pub clipboard: Box<dyn Clipboard>,
}
