//! Scripted collaborators for session tests

use crate::config::{Settings, SettingsLedger};
use crate::document::Document;
use crate::error::{Error, Result};
use crate::session::collab::{
    Answer, Clipboard, OneOfThree, PathPicker, Prompter, Renderer, SessionObserver,
};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::rc::Rc;

// ─────────────────────────────────────────────────────────────────────────────
// Prompter
// ─────────────────────────────────────────────────────────────────────────────

/// Answers questions from queues. An exhausted queue answers Cancel / Third.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    pub answers: VecDeque<Answer>,
    pub choices: VecDeque<OneOfThree>,
    pub questions: Vec<String>,
    pub option_sets: Vec<[String; 3]>,
    pub errors: Vec<String>,
}

impl Prompter for ScriptedPrompter {
    fn ask_yes_no_cancel(&mut self, message: &str) -> Answer {
        self.questions.push(message.to_string());
        self.answers.pop_front().unwrap_or(Answer::Cancel)
    }

    fn ask_one_of_three(&mut self, message: &str, options: [&str; 3]) -> OneOfThree {
        self.questions.push(message.to_string());
        self.option_sets.push(options.map(str::to_string));
        self.choices.pop_front().unwrap_or(OneOfThree::Third)
    }

    fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}

impl<T: Prompter> Prompter for Rc<RefCell<T>> {
    fn ask_yes_no_cancel(&mut self, message: &str) -> Answer {
        self.borrow_mut().ask_yes_no_cancel(message)
    }

    fn ask_one_of_three(&mut self, message: &str, options: [&str; 3]) -> OneOfThree {
        self.borrow_mut().ask_one_of_three(message, options)
    }

    fn show_error(&mut self, message: &str) {
        self.borrow_mut().show_error(message)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Path Picker
// ─────────────────────────────────────────────────────────────────────────────

/// Returns queued paths. An exhausted queue behaves like a cancelled dialog.
#[derive(Debug, Default)]
pub struct ScriptedPicker {
    pub open_paths: VecDeque<Option<PathBuf>>,
    pub save_paths: VecDeque<Option<PathBuf>>,
    /// Suggested names passed to `pick_save_path`
    pub save_requests: Vec<String>,
    pub export_paths: VecDeque<Option<PathBuf>>,
    /// Suggested names passed to `pick_export_path`
    pub export_requests: Vec<String>,
}

impl PathPicker for ScriptedPicker {
    fn pick_open_path(&mut self) -> Option<PathBuf> {
        self.open_paths.pop_front().flatten()
    }

    fn pick_save_path(&mut self, suggested_name: &str) -> Option<PathBuf> {
        self.save_requests.push(suggested_name.to_string());
        self.save_paths.pop_front().flatten()
    }

    fn pick_export_path(&mut self, suggested_name: &str) -> Option<PathBuf> {
        self.export_requests.push(suggested_name.to_string());
        self.export_paths.pop_front().flatten()
    }
}

impl<T: PathPicker> PathPicker for Rc<RefCell<T>> {
    fn pick_open_path(&mut self) -> Option<PathBuf> {
        self.borrow_mut().pick_open_path()
    }

    fn pick_save_path(&mut self, suggested_name: &str) -> Option<PathBuf> {
        self.borrow_mut().pick_save_path(suggested_name)
    }

    fn pick_export_path(&mut self, suggested_name: &str) -> Option<PathBuf> {
        self.borrow_mut().pick_export_path(suggested_name)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Clipboard
// ─────────────────────────────────────────────────────────────────────────────

/// Keeps everything copied to it. Fails every copy when `unavailable`.
#[derive(Debug, Default)]
pub struct RecordingClipboard {
    pub texts: Vec<String>,
    pub unavailable: bool,
}

impl Clipboard for RecordingClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        if self.unavailable {
            return Err(Error::Clipboard("no clipboard".to_string()));
        }
        self.texts.push(text.to_string());
        Ok(())
    }
}

impl<T: Clipboard> Clipboard for Rc<RefCell<T>> {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.borrow_mut().set_text(text)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Observer
// ─────────────────────────────────────────────────────────────────────────────

/// One observed notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Switching(String),
    Switched(Option<String>),
    Reloaded(String),
    Preview(String),
}

/// Records every notification as an [`Event`], labelled by display path.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub events: Vec<Event>,
}

impl RecordingObserver {
    pub fn previews(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Preview(html) => Some(html.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl SessionObserver for RecordingObserver {
    fn on_tab_switching(&mut self, outgoing: &Document) {
        self.events.push(Event::Switching(outgoing.display_path()));
    }

    fn on_tab_switched(&mut self, incoming: Option<&Document>) {
        self.events
            .push(Event::Switched(incoming.map(Document::display_path)));
    }

    fn on_content_reloaded(&mut self, document: &Document) {
        self.events.push(Event::Reloaded(document.content().to_string()));
    }

    fn on_preview_published(&mut self, html: &str) {
        self.events.push(Event::Preview(html.to_string()));
    }
}

impl<T: SessionObserver> SessionObserver for Rc<RefCell<T>> {
    fn on_tab_switching(&mut self, outgoing: &Document) {
        self.borrow_mut().on_tab_switching(outgoing)
    }

    fn on_tab_switched(&mut self, incoming: Option<&Document>) {
        self.borrow_mut().on_tab_switched(incoming)
    }

    fn on_content_reloaded(&mut self, document: &Document) {
        self.borrow_mut().on_content_reloaded(document)
    }

    fn on_preview_published(&mut self, html: &str) {
        self.borrow_mut().on_preview_published(html)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Ledger and Renderer
// ─────────────────────────────────────────────────────────────────────────────

/// Settings ledger held in memory. Clones share the stored value.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    pub stored: Rc<RefCell<Option<Settings>>>,
    pub saves: Rc<RefCell<usize>>,
    pub fail_saves: bool,
}

impl MemoryLedger {
    pub fn saved(&self) -> Option<Settings> {
        self.stored.borrow().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl SettingsLedger for MemoryLedger {
    fn load(&self) -> Settings {
        self.saved().unwrap_or_default()
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        if self.fail_saves {
            return Err(Error::Application("ledger unavailable".to_string()));
        }
        *self.stored.borrow_mut() = Some(settings.clone());
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}

/// Renders text as `<p>text</p>` without any markdown processing.
#[derive(Debug, Default)]
pub struct EchoRenderer;

impl Renderer for EchoRenderer {
    fn render(&self, markdown: &str) -> String {
        format!("<p>{}</p>", markdown)
    }
}
