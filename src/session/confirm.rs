//! Close confirmation for documents with unsaved changes
//!
//! A clean document closes without asking. A dirty one asks the user to
//! save, discard or cancel. The result is returned to the caller, which
//! decides what to remove; nothing here touches the tab collection.

use crate::document::Document;
use crate::drafts::DraftStore;
use crate::error::Result;
use crate::paths;
use crate::session::collab::{Answer, PathPicker, Prompter};
use log::debug;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Outcomes
// ─────────────────────────────────────────────────────────────────────────────

/// A successful explicit save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Saved {
    /// Where the content was written
    pub path: PathBuf,
    /// True when the document moved to a newly chosen location
    pub relocated: bool,
    /// False when a leftover draft could not be deleted
    pub draft_removed: bool,
}

/// Result of asking to close one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseOutcome {
    /// Nothing to lose; no question was asked
    Clean,
    /// The user chose to save and the save succeeded
    Saved(Saved),
    /// The user chose to drop the edits
    Discarded,
    /// The user cancelled, or the save did not happen
    Cancelled,
}

impl CloseOutcome {
    pub fn allows_close(&self) -> bool {
        !matches!(self, CloseOutcome::Cancelled)
    }
}

/// Text of the unsaved-changes question for `document`.
pub fn close_prompt(document: &Document) -> String {
    format!(
        "'{}' has unsaved changes.\n\nDo you want to save before closing?",
        document.file_name()
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Protocol
// ─────────────────────────────────────────────────────────────────────────────

/// Ask whether `document` may be closed.
///
/// Only the `Saved` path writes anything. A discarded document keeps its
/// draft until the caller actually removes it, so a batch that is later
/// cancelled loses nothing.
pub fn confirm_close(
    document: &mut Document,
    drafts: &DraftStore,
    prompter: &mut dyn Prompter,
    picker: &mut dyn PathPicker,
) -> CloseOutcome {
    if !document.is_dirty() {
        return CloseOutcome::Clean;
    }

    match prompter.ask_yes_no_cancel(&close_prompt(document)) {
        Answer::Yes => match save_document(document, drafts, picker) {
            Ok(Some(saved)) => CloseOutcome::Saved(saved),
            Ok(None) => {
                debug!("Save location not chosen, close cancelled");
                CloseOutcome::Cancelled
            }
            Err(e) => {
                prompter.show_error(&format!("Failed to save file:\n{}", e));
                CloseOutcome::Cancelled
            }
        },
        Answer::No => CloseOutcome::Discarded,
        Answer::Cancel => CloseOutcome::Cancelled,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Save Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Save `document` in place, or via the save picker if it was never saved.
///
/// Returns `Ok(None)` when the user dismissed the picker. The draft is
/// deleted after a successful write.
pub fn save_document(
    document: &mut Document,
    drafts: &DraftStore,
    picker: &mut dyn PathPicker,
) -> Result<Option<Saved>> {
    if document.is_new() {
        return save_document_as(document, drafts, picker);
    }

    document.save()?;
    let draft_removed = drafts.delete(document);
    Ok(document.path().map(|path| Saved {
        path: path.to_path_buf(),
        relocated: false,
        draft_removed,
    }))
}

/// Save `document` to a location chosen through the picker.
///
/// Drafts under both the previous and the new identity are deleted, so an
/// untitled draft is not left behind.
pub fn save_document_as(
    document: &mut Document,
    drafts: &DraftStore,
    picker: &mut dyn PathPicker,
) -> Result<Option<Saved>> {
    let Some(target) = picker.pick_save_path(&document.file_name()) else {
        return Ok(None);
    };
    let target = paths::absolute(&target);

    let previous_draft = drafts.path_for(document);
    document.save_as(&target)?;
    let previous_removed = drafts.delete_at(&previous_draft);
    let current_removed = drafts.delete(document);
    debug!("Moved draft identity of document {}", document.id());

    Ok(Some(Saved {
        path: target,
        relocated: true,
        draft_removed: previous_removed && current_removed,
    }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::{ScriptedPicker, ScriptedPrompter};
    use std::path::Path;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        drafts: DraftStore,
        prompter: ScriptedPrompter,
        picker: ScriptedPicker,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let drafts = DraftStore::new(dir.path().join("drafts"));
            Self {
                dir,
                drafts,
                prompter: ScriptedPrompter::default(),
                picker: ScriptedPicker::default(),
            }
        }

        fn file(&self, name: &str, content: &str) -> PathBuf {
            let path = self.dir.path().join(name);
            std::fs::write(&path, content).unwrap();
            path
        }

        fn confirm(&mut self, document: &mut Document) -> CloseOutcome {
            confirm_close(
                document,
                &self.drafts,
                &mut self.prompter,
                &mut self.picker,
            )
        }
    }

    #[test]
    fn test_clean_document_closes_without_prompt() {
        let mut fx = Fixture::new();
        let mut doc = Document::create_new();

        assert_eq!(fx.confirm(&mut doc), CloseOutcome::Clean);
        assert!(fx.prompter.questions.is_empty());
    }

    #[test]
    fn test_cancel_denies_close_and_keeps_edits() {
        let mut fx = Fixture::new();
        let path = fx.file("a.md", "X");
        let mut doc = Document::open(&path).unwrap();
        doc.set_content("Y");
        fx.drafts.write(&doc).unwrap();
        fx.prompter.answers.push_back(Answer::Cancel);

        let outcome = fx.confirm(&mut doc);
        assert_eq!(outcome, CloseOutcome::Cancelled);
        assert!(!outcome.allows_close());
        assert!(doc.is_dirty());
        assert!(fx.drafts.exists(&path));
        assert_eq!(
            fx.prompter.questions,
            vec!["'a.md' has unsaved changes.\n\nDo you want to save before closing?"]
        );
    }

    #[test]
    fn test_discard_allows_close_and_keeps_draft_for_caller() {
        let mut fx = Fixture::new();
        let path = fx.file("a.md", "X");
        let mut doc = Document::open(&path).unwrap();
        doc.set_content("Y");
        fx.drafts.write(&doc).unwrap();
        fx.prompter.answers.push_back(Answer::No);

        let outcome = fx.confirm(&mut doc);
        assert_eq!(outcome, CloseOutcome::Discarded);
        assert!(outcome.allows_close());
        assert!(fx.drafts.exists(&path));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "X");
    }

    #[test]
    fn test_save_writes_file_and_deletes_draft() {
        let mut fx = Fixture::new();
        let path = fx.file("a.md", "X");
        let mut doc = Document::open(&path).unwrap();
        doc.set_content("Y");
        fx.drafts.write(&doc).unwrap();
        fx.prompter.answers.push_back(Answer::Yes);

        let outcome = fx.confirm(&mut doc);
        assert_eq!(
            outcome,
            CloseOutcome::Saved(Saved {
                path: path.clone(),
                relocated: false,
                draft_removed: true,
            })
        );
        assert!(!doc.is_dirty());
        assert!(!fx.drafts.exists(&path));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Y");
        assert!(fx.picker.save_requests.is_empty());
    }

    #[test]
    fn test_save_new_document_uses_picker() {
        let mut fx = Fixture::new();
        let target = fx.dir.path().join("picked.md");
        let mut doc = Document::create_new();
        doc.set_content("hello");
        let untitled_draft = fx.drafts.write(&doc).unwrap();
        fx.prompter.answers.push_back(Answer::Yes);
        fx.picker.save_paths.push_back(Some(target.clone()));

        let outcome = fx.confirm(&mut doc);
        assert!(matches!(outcome, CloseOutcome::Saved(Saved { relocated: true, .. })));
        assert_eq!(fx.picker.save_requests, vec!["Untitled.md"]);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "hello");
        assert!(!untitled_draft.exists());
    }

    #[test]
    fn test_picker_cancel_is_treated_as_cancel() {
        let mut fx = Fixture::new();
        let mut doc = Document::create_new();
        doc.set_content("hello");
        fx.prompter.answers.push_back(Answer::Yes);
        fx.picker.save_paths.push_back(None);

        assert_eq!(fx.confirm(&mut doc), CloseOutcome::Cancelled);
        assert!(doc.is_dirty());
        assert!(doc.is_new());
    }

    #[test]
    fn test_failed_save_is_reported_and_cancels() {
        let mut fx = Fixture::new();
        let target = fx.dir.path().join("missing_dir").join("x.md");
        let mut doc = Document::create_new();
        doc.set_content("hello");
        fx.prompter.answers.push_back(Answer::Yes);
        fx.picker.save_paths.push_back(Some(target));

        assert_eq!(fx.confirm(&mut doc), CloseOutcome::Cancelled);
        assert_eq!(fx.prompter.errors.len(), 1);
        assert!(fx.prompter.errors[0].starts_with("Failed to save file:"));
        assert!(doc.is_dirty());
        assert!(doc.path().is_none());
    }

    #[test]
    fn test_save_as_relocates_and_cleans_both_drafts() {
        let mut fx = Fixture::new();
        let old = fx.file("old.md", "X");
        let new = fx.dir.path().join("new.md");
        let mut doc = Document::open(&old).unwrap();
        doc.set_content("Y");
        fx.drafts.write(&doc).unwrap();
        std::fs::write(fx.drafts.path_for_file(&new), "stale").unwrap();
        fx.picker.save_paths.push_back(Some(new.clone()));

        let saved = save_document_as(&mut doc, &fx.drafts, &mut fx.picker)
            .unwrap()
            .unwrap();
        assert_eq!(saved.path, new);
        assert!(doc.has_path(Path::new(&new)));
        assert!(!fx.drafts.exists(&old));
        assert!(!fx.drafts.exists(&new));
        assert_eq!(std::fs::read_to_string(&old).unwrap(), "X");
    }

    #[test]
    fn test_save_as_resolves_relative_segments() {
        let mut fx = Fixture::new();
        std::fs::create_dir(fx.dir.path().join("sub")).unwrap();
        let mut doc = Document::create_new();
        doc.set_content("hello");
        let spelled = fx.dir.path().join("sub").join("..").join("notes.md");
        fx.picker.save_paths.push_back(Some(spelled));

        let saved = save_document_as(&mut doc, &fx.drafts, &mut fx.picker)
            .unwrap()
            .unwrap();
        let expected = fx.dir.path().join("notes.md");
        assert_eq!(saved.path, expected);
        assert_eq!(doc.path(), Some(expected.as_path()));
    }

    #[test]
    fn test_undeletable_draft_is_reported() {
        let mut fx = Fixture::new();
        let path = fx.file("a.md", "X");
        let mut doc = Document::open(&path).unwrap();
        doc.set_content("Y");
        std::fs::create_dir_all(fx.drafts.path_for(&doc)).unwrap();

        let saved = save_document(&mut doc, &fx.drafts, &mut fx.picker)
            .unwrap()
            .unwrap();
        assert!(!saved.draft_removed);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Y");
    }
}
