//! Startup restore and shutdown snapshot of the open-document set
//!
//! On startup the remembered paths are reopened, and any draft left behind
//! by a previous run is offered to the user before the document is
//! finalized. On shutdown the saved documents' paths are recorded.

use crate::config::SessionSnapshot;
use crate::document::Document;
use crate::drafts::DraftStore;
use crate::error::Error;
use crate::paths;
use crate::session::collab::{OneOfThree, Prompter};
use crate::session::tabs::TabCollection;
use log::{info, warn};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Draft Recovery
// ─────────────────────────────────────────────────────────────────────────────

/// How a document's leftover draft was dealt with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftResolution {
    /// There was no readable draft
    NoDraft,
    /// The draft content replaced the loaded content
    Recovered,
    /// The file content was kept and the draft deleted
    Original,
    /// The user does not want the document opened; the draft is kept
    Declined,
}

/// Text of the draft recovery question for `document`.
pub fn recovery_prompt(document: &Document) -> String {
    format!(
        "A draft version of '{}' was found (possibly from a crash).\n\n\
         Do you want to recover the draft?",
        document.file_name()
    )
}

/// Offer the draft for a freshly loaded `document`, if one exists.
///
/// `decline_label` names the third option, e.g. "Don't open" or "Skip".
pub fn resolve_draft(
    document: &mut Document,
    drafts: &DraftStore,
    prompter: &mut dyn Prompter,
    decline_label: &str,
) -> DraftResolution {
    let Some(path) = document.path().map(|p| p.to_path_buf()) else {
        return DraftResolution::NoDraft;
    };
    let Some(draft) = drafts.read(&path) else {
        return DraftResolution::NoDraft;
    };

    let options = ["Load draft", "Load original", decline_label];
    match prompter.ask_one_of_three(&recovery_prompt(document), options) {
        OneOfThree::First => {
            document.recover_content(draft);
            info!("Recovered draft for {}", path.display());
            DraftResolution::Recovered
        }
        OneOfThree::Second => {
            drafts.delete(document);
            DraftResolution::Original
        }
        OneOfThree::Third => DraftResolution::Declined,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Restore
// ─────────────────────────────────────────────────────────────────────────────

/// Aggregated outcome of a session restore.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Documents reopened
    pub restored: usize,
    /// Of those, documents whose draft was loaded
    pub recovered: usize,
    /// Documents the user chose to skip
    pub skipped: usize,
    /// Remembered paths that no longer exist or could not be read
    pub missing: Vec<PathBuf>,
}

impl RestoreReport {
    /// One status line for the whole restore.
    ///
    /// Missing files take precedence over the success count.
    pub fn status(&self) -> Option<String> {
        match self.missing.as_slice() {
            [] => match self.restored {
                0 => None,
                1 => Some("Session restored (1 file)".to_string()),
                n => Some(format!("Session restored ({} files)", n)),
            },
            [only] => Some(format!(
                "Could not restore: {} (file not found)",
                paths::file_name_of(only)
            )),
            many => Some(format!("Could not restore {} files (not found)", many.len())),
        }
    }
}

/// Documents rebuilt from a snapshot.
#[derive(Debug, Default)]
pub struct RestoredSession {
    pub documents: Vec<Document>,
    /// Index into `documents` to select; meaningless when empty
    pub selected_index: usize,
    pub report: RestoreReport,
}

/// Reopen the documents listed in `snapshot`.
///
/// Missing paths are collected in the report and never stop the rest from
/// loading. Repeated paths are opened once.
pub fn restore_session(
    snapshot: &SessionSnapshot,
    drafts: &DraftStore,
    prompter: &mut dyn Prompter,
) -> RestoredSession {
    let mut session = RestoredSession::default();
    let mut selected = None;

    for (position, path) in snapshot.open_paths.iter().enumerate() {
        if session.documents.iter().any(|d| d.has_path(path)) {
            continue;
        }
        let opened = if path.is_file() {
            Document::open(path)
        } else {
            Err(Error::NotFound(path.clone()))
        };
        let mut document = match opened {
            Ok(document) => document,
            Err(e) => {
                warn!("Could not restore session file: {}", e);
                session.report.missing.push(path.clone());
                continue;
            }
        };

        match resolve_draft(&mut document, drafts, prompter, "Skip") {
            DraftResolution::Declined => {
                info!("Skipped restoring {}", path.display());
                session.report.skipped += 1;
                continue;
            }
            DraftResolution::Recovered => session.report.recovered += 1,
            DraftResolution::NoDraft | DraftResolution::Original => {}
        }

        if position == snapshot.selected_index {
            selected = Some(session.documents.len());
        }
        session.documents.push(document);
    }

    session.report.restored = session.documents.len();
    session.selected_index = selected.unwrap_or_else(|| {
        snapshot
            .selected_index
            .min(session.documents.len().saturating_sub(1))
    });

    info!(
        "Session restore: {} restored, {} skipped, {} missing",
        session.report.restored,
        session.report.skipped,
        session.report.missing.len()
    );
    session
}

// ─────────────────────────────────────────────────────────────────────────────
// Snapshot
// ─────────────────────────────────────────────────────────────────────────────

/// Record the saved documents currently open, in tab order.
///
/// New and unsaved documents are left out; the selected index is adjusted
/// to count only the documents that were kept.
pub fn snapshot_session(tabs: &TabCollection) -> SessionSnapshot {
    let mut snapshot = SessionSnapshot::default();
    let selected = tabs.selected_index();

    for (index, document) in tabs.documents().iter().enumerate() {
        if selected == Some(index) {
            snapshot.selected_index = snapshot.open_paths.len();
        }
        if document.is_new() {
            continue;
        }
        if let Some(path) = document.path() {
            snapshot.open_paths.push(path.to_path_buf());
        }
    }

    if snapshot.selected_index >= snapshot.open_paths.len() {
        snapshot.selected_index = snapshot.open_paths.len().saturating_sub(1);
    }
    snapshot
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
