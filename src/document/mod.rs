//! In-memory documents for Draftpad
//!
//! A [`Document`] is one text buffer with its file-path identity and dirty
//! tracking. Dirtiness is never stored: it is always the comparison of the
//! current content against the content as of the last load or save.

use crate::error::{Error, Result};
use crate::paths;
use chrono::{DateTime, Local};
use log::{debug, info};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

/// Display name used for documents that have never been saved.
pub const UNTITLED_NAME: &str = "Untitled.md";

/// Maximum number of entries kept on the undo stack.
const MAX_UNDO_SIZE: usize = 100;

static NEXT_DOCUMENT_ID: AtomicU64 = AtomicU64::new(1);

static RUN_TAG: OnceLock<String> = OnceLock::new();

/// Tag of the current process: start time in milliseconds and process id.
///
/// Untitled drafts carry it in their names, so a later run never reuses the
/// name of a draft an earlier run left behind.
fn run_tag() -> &'static str {
    RUN_TAG.get_or_init(|| {
        format!(
            "{:x}-{:x}",
            Local::now().timestamp_millis(),
            std::process::id()
        )
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Document Identity
// ─────────────────────────────────────────────────────────────────────────────

/// Identity token for a document.
///
/// The counter is per process; the displayed form also carries the run tag,
/// which makes it unique across runs. Unsaved documents use it to key their
/// recovery drafts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(u64);

impl DocumentId {
    /// Allocate the next identity token.
    pub fn next() -> Self {
        Self(NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw token value.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:08x}", run_tag(), self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Document
// ─────────────────────────────────────────────────────────────────────────────

/// A single open text document.
#[derive(Debug, Clone)]
pub struct Document {
    id: DocumentId,
    /// File path (None for unsaved/new documents)
    path: Option<PathBuf>,
    /// Current text
    content: String,
    /// Text as of the last load or save
    original_content: String,
    /// True until the first successful save
    is_new: bool,
    last_saved: Option<DateTime<Local>>,
    last_auto_saved: Option<DateTime<Local>>,
    undo_stack: Vec<String>,
    redo_stack: Vec<String>,
}

impl Document {
    /// Create a new, empty, unsaved document.
    pub fn create_new() -> Self {
        Self {
            id: DocumentId::next(),
            path: None,
            content: String::new(),
            original_content: String::new(),
            is_new: true,
            last_saved: None,
            last_auto_saved: None,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Load a document from disk.
    ///
    /// The loaded text becomes both the current and the original content,
    /// so the document starts clean.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|source| Error::FileRead {
            path: path.clone(),
            source,
        })?;
        debug!("Loaded {} ({} bytes)", path.display(), content.len());
        Ok(Self::with_content(path, content))
    }

    /// Build a clean document for `path` from already-loaded text.
    pub fn with_content(path: PathBuf, content: String) -> Self {
        Self {
            id: DocumentId::next(),
            path: Some(path),
            original_content: content.clone(),
            content,
            is_new: false,
            last_saved: None,
            last_auto_saved: None,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// Whether the content differs from the last loaded or saved text.
    pub fn is_dirty(&self) -> bool {
        self.content != self.original_content
    }

    pub fn last_saved(&self) -> Option<DateTime<Local>> {
        self.last_saved
    }

    pub fn last_auto_saved(&self) -> Option<DateTime<Local>> {
        self.last_auto_saved
    }

    /// Whether the document names `path` (case-insensitive).
    pub fn has_path(&self, path: &Path) -> bool {
        self.path
            .as_deref()
            .map(|p| paths::same_path(p, path))
            .unwrap_or(false)
    }

    /// Whether this tab may be overwritten when another document is opened:
    /// never saved, unedited and empty.
    pub fn is_replaceable(&self) -> bool {
        self.is_new && !self.is_dirty() && self.content.is_empty()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Derived Labels
    // ─────────────────────────────────────────────────────────────────────────

    /// File name shown on the tab.
    pub fn file_name(&self) -> String {
        self.path
            .as_deref()
            .map(paths::file_name_of)
            .unwrap_or_else(|| UNTITLED_NAME.to_string())
    }

    /// Tab title, prefixed with `*` when there are unsaved changes.
    pub fn title(&self) -> String {
        if self.is_dirty() {
            format!("*{}", self.file_name())
        } else {
            self.file_name()
        }
    }

    /// Full path for status display.
    pub fn display_path(&self) -> String {
        self.path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "New Document".to_string())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Editing
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the content, recording the previous text for undo.
    pub fn set_content(&mut self, new_content: impl Into<String>) {
        let new_content = new_content.into();
        if new_content != self.content {
            let previous = std::mem::replace(&mut self.content, new_content);
            self.undo_stack.push(previous);
            if self.undo_stack.len() > MAX_UNDO_SIZE {
                self.undo_stack.remove(0);
            }
            self.redo_stack.clear();
        }
    }

    /// Undo the last edit. Returns `true` if anything changed.
    pub fn undo(&mut self) -> bool {
        if let Some(previous) = self.undo_stack.pop() {
            let current = std::mem::replace(&mut self.content, previous);
            self.redo_stack.push(current);
            true
        } else {
            false
        }
    }

    /// Redo the last undone edit. Returns `true` if anything changed.
    pub fn redo(&mut self) -> bool {
        if let Some(next) = self.redo_stack.pop() {
            let current = std::mem::replace(&mut self.content, next);
            self.undo_stack.push(current);
            true
        } else {
            false
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Discard in-memory edits, going back to the last loaded or saved text.
    ///
    /// The revert itself is undoable. Any recovery draft is left alone.
    pub fn revert(&mut self) {
        let original = self.original_content.clone();
        self.set_content(original);
    }

    /// Replace the content with recovered text (e.g. a draft).
    pub fn recover_content(&mut self, recovered: String) {
        self.set_content(recovered);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Saving
    // ─────────────────────────────────────────────────────────────────────────

    /// Write the content to the document's path.
    ///
    /// Fails with `InvalidState` when the document has no path. On a write
    /// failure nothing in the document changes.
    pub fn save(&mut self) -> Result<()> {
        let path = self.path.clone().ok_or_else(|| {
            Error::InvalidState(
                "Cannot save document without a file path. Use Save As instead.".to_string(),
            )
        })?;
        self.write_to(&path)?;
        self.mark_as_saved();
        self.is_new = false;
        info!("Saved file: {}", path.display());
        Ok(())
    }

    /// Write the content to `path` and adopt it as the document's path.
    ///
    /// The path only changes once the write has succeeded.
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        self.write_to(&path)?;
        info!("Saved file as: {}", path.display());
        self.path = Some(path);
        self.mark_as_saved();
        self.is_new = false;
        Ok(())
    }

    /// Adopt the current content as the saved text without writing anything.
    pub fn mark_as_saved(&mut self) {
        self.original_content = self.content.clone();
        self.last_saved = Some(Local::now());
    }

    /// Record that a recovery draft of the current content was written.
    pub fn mark_auto_saved(&mut self) {
        self.last_auto_saved = Some(Local::now());
    }

    fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, &self.content).map_err(|source| Error::FileWrite {
            path: path.to_path_buf(),
            source,
        })
    }

}

impl Default for Document {
    fn default() -> Self {
        Self::create_new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
