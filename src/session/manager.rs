//! The session manager: single owner of the open documents
//!
//! Every user action, timer expiry and lifecycle step goes through
//! `&mut SessionManager`, so all mutations of documents, drafts, preview
//! and status are serialized on the owning thread.

use crate::config::{save_config_silent, RecentFile, Settings};
use crate::document::Document;
use crate::error::Result;
use crate::paths;
use crate::preview::{self, TextStats};
use crate::session::autosave::{self, AutosaveScheduler};
use crate::session::collab::Services;
use crate::session::confirm::{self, CloseOutcome, Saved};
use crate::session::debounce::Debouncer;
use crate::session::reconcile::{self, DraftResolution, RestoreReport};
use crate::session::tabs::TabCollection;
use chrono::Local;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Owns the tab collection, both timers and every collaborator.
pub struct SessionManager {
    settings: Settings,
    settings_dirty: bool,
    services: Services,
    tabs: TabCollection,
    preview_timer: Debouncer,
    autosave: AutosaveScheduler,
    preview_html: String,
    stats: TextStats,
    status: String,
    show_welcome: bool,
    shut_down: bool,
}

impl SessionManager {
    /// Create a manager with no open documents. Call [`initialize`] next.
    ///
    /// [`initialize`]: SessionManager::initialize
    pub fn new(settings: Settings, services: Services, now: Instant) -> Self {
        let preview_timer = Debouncer::new(Duration::from_millis(settings.preview_delay_ms));
        let autosave = AutosaveScheduler::new(
            settings.auto_save,
            Duration::from_secs(u64::from(settings.auto_save_interval_secs)),
            now,
        );
        Self {
            settings,
            settings_dirty: false,
            services,
            tabs: TabCollection::new(),
            preview_timer,
            autosave,
            preview_html: String::new(),
            stats: TextStats::default(),
            status: "Ready".to_string(),
            show_welcome: false,
            shut_down: false,
        }
    }

    /// Populate the initial tab set.
    ///
    /// An existing `startup_path` takes precedence over the remembered
    /// session. If nothing ends up open, the welcome state or a fresh
    /// untitled document is shown depending on settings.
    pub fn initialize(&mut self, startup_path: Option<PathBuf>) -> RestoreReport {
        if let Some(path) = startup_path {
            if path.is_file() {
                info!("Opening startup file: {}", path.display());
                self.open_path(&path);
                self.fill_if_empty();
                return RestoreReport::default();
            }
            warn!("Startup file not found: {}", path.display());
        }

        let snapshot = self.settings.session.clone();
        let restored = reconcile::restore_session(
            &snapshot,
            &self.services.drafts,
            self.services.prompter.as_mut(),
        );

        if !restored.documents.is_empty() {
            let documents = restored.documents;
            let selected = restored.selected_index;
            self.switch_with(|tabs| {
                for document in documents {
                    tabs.add(document, false);
                }
                tabs.select(selected);
            });
        }
        if let Some(status) = restored.report.status() {
            self.status = status;
        }

        self.fill_if_empty();
        restored.report
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    pub fn tabs(&self) -> &TabCollection {
        &self.tabs
    }

    pub fn current(&self) -> Option<&Document> {
        self.tabs.current()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.tabs.selected_index()
    }

    pub fn status_text(&self) -> &str {
        &self.status
    }

    pub fn stats(&self) -> TextStats {
        self.stats
    }

    /// HTML most recently published for the current document.
    pub fn preview_html(&self) -> &str {
        &self.preview_html
    }

    /// Whether the welcome screen should be shown instead of an editor.
    pub fn show_welcome(&self) -> bool {
        self.show_welcome
    }

    pub fn window_title(&self) -> String {
        match self.tabs.current() {
            Some(document) => format!("{} - {}", document.title(), crate::APP_NAME),
            None => crate::APP_NAME.to_string(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Recent files that still exist, most recent first.
    pub fn recent_files(&self) -> Vec<RecentFile> {
        self.settings.existing_recent_files()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.tabs.has_unsaved_changes()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Opening Documents
    // ─────────────────────────────────────────────────────────────────────────

    /// Open a new untitled document, replacing an untouched empty tab.
    pub fn new_document(&mut self) {
        self.add_document(Document::create_new(), true);
        self.show_welcome = false;
        self.status = "New document created".to_string();
    }

    /// Open `path`, or switch to it if it is already open.
    ///
    /// Relative paths are resolved against the current directory. A leftover
    /// draft for the file is offered first. Returns `true` if the document is
    /// now selected.
    pub fn open_path(&mut self, path: &Path) -> bool {
        let path = &paths::absolute(path);
        if let Some(index) = self.tabs.find_by_path(path) {
            self.select_tab(index);
            self.show_welcome = false;
            self.status = format!("Switched to: {}", paths::file_name_of(path));
            return true;
        }

        let mut document = match Document::open(path) {
            Ok(document) => document,
            Err(e) => {
                warn!("Failed to open {}: {}", path.display(), e);
                if e.is_not_found() {
                    self.settings.remove_recent_file(path);
                    self.settings_dirty = true;
                    self.save_settings_if_dirty();
                }
                self.services
                    .prompter
                    .show_error(&format!("Failed to open file:\n{}", e));
                return false;
            }
        };

        let resolution = reconcile::resolve_draft(
            &mut document,
            &self.services.drafts,
            self.services.prompter.as_mut(),
            "Don't open",
        );
        self.status = match resolution {
            DraftResolution::Declined => {
                debug!("Open of {} declined at draft prompt", path.display());
                return false;
            }
            DraftResolution::Recovered => "Draft recovered - remember to save".to_string(),
            DraftResolution::NoDraft | DraftResolution::Original => {
                format!("Opened: {}", path.display())
            }
        };

        self.add_document(document, true);
        self.show_welcome = false;
        self.settings.add_recent_file(path.to_path_buf());
        self.settings_dirty = true;
        self.save_settings_if_dirty();
        info!("Opened file: {}", path.display());
        true
    }

    /// Ask for a file and open it.
    pub fn open_via_picker(&mut self) -> bool {
        match self.services.picker.pick_open_path() {
            Some(path) => self.open_path(&path),
            None => false,
        }
    }

    /// Open an entry from the recent-files list, forgetting it if it is gone.
    pub fn open_recent(&mut self, path: &Path) -> bool {
        if !path.is_file() {
            self.settings.remove_recent_file(path);
            self.settings_dirty = true;
            self.save_settings_if_dirty();
            self.status = format!("File not found: {}", paths::file_name_of(path));
            return false;
        }
        self.open_path(path)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────────

    /// Select the tab at `index`. Selecting the current tab is a no-op.
    pub fn select_tab(&mut self, index: usize) -> bool {
        if self.tabs.selected_index() == Some(index) {
            return true;
        }
        if index >= self.tabs.len() {
            warn!("Invalid tab index: {}", index);
            return false;
        }
        self.switch_with(|tabs| tabs.select(index))
    }

    pub fn select_next(&mut self) {
        if let Some(index) = self.tabs.next_index() {
            self.select_tab(index);
        }
    }

    pub fn select_previous(&mut self) {
        if let Some(index) = self.tabs.previous_index() {
            self.select_tab(index);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Closing
    // ─────────────────────────────────────────────────────────────────────────

    /// Close the tab at `index` after confirmation.
    ///
    /// Returns `false` if the user cancelled; the collection is then
    /// unchanged.
    pub fn close_tab(&mut self, index: usize) -> bool {
        if !self.confirm_batch(&[index]) {
            return false;
        }
        if let Some(removed) = self.switch_with(|tabs| tabs.remove(index)) {
            debug!("Closed {}", removed.display_path());
            self.delete_drafts(std::slice::from_ref(&removed));
        }
        self.fill_if_empty();
        true
    }

    pub fn close_current(&mut self) -> bool {
        match self.tabs.selected_index() {
            Some(index) => self.close_tab(index),
            None => false,
        }
    }

    /// Close every tab except the selected one.
    ///
    /// If any document's confirmation is cancelled, nothing is closed.
    pub fn close_others(&mut self) -> bool {
        let Some(keep) = self.tabs.selected_index() else {
            return false;
        };
        let others: Vec<usize> = (0..self.tabs.len()).filter(|&i| i != keep).collect();
        if others.is_empty() {
            return true;
        }
        if !self.confirm_batch(&others) {
            return false;
        }
        let removed = self.switch_with(|tabs| tabs.remove_all_except(keep));
        self.delete_drafts(&removed);
        true
    }

    /// Close every tab. If any confirmation is cancelled, nothing is closed.
    pub fn close_all(&mut self) -> bool {
        let all: Vec<usize> = (0..self.tabs.len()).collect();
        if !self.confirm_batch(&all) {
            return false;
        }
        let removed = self.switch_with(TabCollection::clear);
        self.delete_drafts(&removed);
        self.fill_if_empty();
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Saving
    // ─────────────────────────────────────────────────────────────────────────

    /// Save the current document, asking for a location if it is new.
    pub fn save_current(&mut self) -> bool {
        let Some(document) = self.tabs.current_mut() else {
            return false;
        };
        let result = confirm::save_document(
            document,
            &self.services.drafts,
            self.services.picker.as_mut(),
        );
        self.finish_save(result)
    }

    /// Save the current document to a newly chosen location.
    pub fn save_current_as(&mut self) -> bool {
        let Some(document) = self.tabs.current_mut() else {
            return false;
        };
        let result = confirm::save_document_as(
            document,
            &self.services.drafts,
            self.services.picker.as_mut(),
        );
        self.finish_save(result)
    }

    fn finish_save(&mut self, result: Result<Option<Saved>>) -> bool {
        match result {
            Ok(Some(saved)) => {
                self.status = format!("Saved: {}", saved.path.display());
                if !saved.draft_removed {
                    self.status.push_str(" (draft could not be removed)");
                }
                self.record_saved(&saved);
                self.save_settings_if_dirty();
                true
            }
            Ok(None) => false,
            Err(e) => {
                warn!("Save failed: {}", e);
                self.services
                    .prompter
                    .show_error(&format!("Failed to save file:\n{}", e));
                false
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Export and Clipboard
    // ─────────────────────────────────────────────────────────────────────────

    /// Write the current preview to an HTML file chosen by the user.
    ///
    /// A pending preview update is flushed first so the export matches the
    /// text in the editor.
    pub fn export_html(&mut self) -> bool {
        let Some(document) = self.tabs.current() else {
            return false;
        };
        let name = document.file_name();
        let title = match Path::new(&name).file_stem() {
            Some(stem) => stem.to_string_lossy().into_owned(),
            None => name.clone(),
        };

        let Some(target) = self
            .services
            .picker
            .pick_export_path(&format!("{}.html", title))
        else {
            return false;
        };
        let target = paths::absolute(&target);

        if self.preview_timer.next_deadline().is_some() {
            self.publish_preview();
        }
        match preview::write_html_document(&target, &title, &self.preview_html) {
            Ok(()) => {
                self.status = format!("Exported: {}", target.display());
                true
            }
            Err(e) => {
                warn!("Export failed: {}", e);
                self.services
                    .prompter
                    .show_error(&format!("Failed to export:\n{}", e));
                false
            }
        }
    }

    /// Copy the current document's path to the clipboard.
    ///
    /// Does nothing for a document that has never been saved.
    pub fn copy_current_path(&mut self) -> bool {
        let Some(path) = self.tabs.current().and_then(Document::path) else {
            return false;
        };
        let text = path.display().to_string();
        match self.services.clipboard.set_text(&text) {
            Ok(()) => {
                self.status = "File path copied to clipboard".to_string();
                true
            }
            Err(e) => {
                warn!("Could not copy {}: {}", text, e);
                self.status = format!("Could not copy path: {}", e);
                false
            }
        }
    }

    fn record_saved(&mut self, saved: &Saved) {
        if saved.relocated {
            self.settings.add_recent_file(saved.path.clone());
            self.settings_dirty = true;
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Editing
    // ─────────────────────────────────────────────────────────────────────────

    /// The editor's text for the current document changed.
    ///
    /// Statistics update immediately; the preview is regenerated once the
    /// edits have been quiet for the preview delay.
    pub fn on_content_changed(&mut self, text: &str, now: Instant) {
        let Some(document) = self.tabs.current_mut() else {
            return;
        };
        if document.content() == text {
            return;
        }
        document.set_content(text);
        self.stats = TextStats::from_text(text);
        self.preview_timer.schedule(now);
    }

    pub fn undo_current(&mut self) -> bool {
        self.edit_current(Document::undo)
    }

    pub fn redo_current(&mut self) -> bool {
        self.edit_current(Document::redo)
    }

    /// Drop in-memory edits of the current document. Its draft is kept.
    pub fn revert_current(&mut self) -> bool {
        let reverted = self.edit_current(|document| {
            if document.is_dirty() {
                document.revert();
                true
            } else {
                false
            }
        });
        if reverted {
            if let Some(document) = self.tabs.current() {
                self.status = format!("Reverted: {}", document.file_name());
            }
        }
        reverted
    }

    fn edit_current(&mut self, edit: impl FnOnce(&mut Document) -> bool) -> bool {
        let changed = self.tabs.current_mut().map(edit).unwrap_or(false);
        if changed {
            if let Some(document) = self.tabs.current() {
                self.services.observer.on_content_reloaded(document);
            }
            self.refresh_current();
        }
        changed
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Timers
    // ─────────────────────────────────────────────────────────────────────────

    /// Fire whatever timers are due at `now`. Returns `true` if any fired.
    ///
    /// The preview is handled before autosave.
    pub fn poll(&mut self, now: Instant) -> bool {
        let mut fired = false;
        if self.preview_timer.poll(now) {
            self.publish_preview();
            fired = true;
        }
        if self.autosave.poll(now) {
            self.run_autosave();
            fired = true;
        }
        fired
    }

    /// Earliest instant at which [`poll`](SessionManager::poll) has work.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.preview_timer.next_deadline(), self.autosave.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn run_autosave(&mut self) {
        let report = autosave::write_drafts(self.tabs.documents_mut(), &self.services.drafts);
        if let Some(status) = report.status(Local::now()) {
            self.status = status;
        }
    }

    /// Reconfigure autosave at runtime. Disabling keeps existing drafts.
    pub fn set_auto_save(&mut self, enabled: bool, interval_secs: u32, now: Instant) {
        let interval_secs = interval_secs.max(Settings::MIN_AUTO_SAVE_INTERVAL_SECS);
        self.settings.auto_save = enabled;
        self.settings.auto_save_interval_secs = interval_secs;
        self.autosave
            .set_interval(Duration::from_secs(u64::from(interval_secs)), now);
        self.autosave.set_enabled(enabled, now);
        self.settings_dirty = true;
        self.save_settings_if_dirty();
        info!(
            "Autosave {} every {}s",
            if enabled { "enabled" } else { "disabled" },
            interval_secs
        );
    }

    /// Change the quiet period before the preview regenerates.
    pub fn set_preview_delay(&mut self, delay_ms: u64) {
        let delay_ms = delay_ms.clamp(Settings::MIN_PREVIEW_DELAY_MS, Settings::MAX_PREVIEW_DELAY_MS);
        self.settings.preview_delay_ms = delay_ms;
        self.preview_timer.set_delay(Duration::from_millis(delay_ms));
        self.settings_dirty = true;
        self.save_settings_if_dirty();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Settings
    // ─────────────────────────────────────────────────────────────────────────

    /// Update settings and mark them as dirty.
    pub fn update_settings<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        f(&mut self.settings);
        self.settings_dirty = true;
    }

    /// Persist settings through the ledger if they changed.
    ///
    /// The session snapshot is refreshed first, so a crash after this point
    /// still remembers the open files. Returns `true` if settings were saved.
    pub fn save_settings_if_dirty(&mut self) -> bool {
        if !self.settings_dirty {
            return false;
        }
        self.settings.session = reconcile::snapshot_session(&self.tabs);
        if save_config_silent(self.services.ledger.as_ref(), &self.settings) {
            self.settings_dirty = false;
            debug!("Settings saved");
            return true;
        }
        false
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Run the close protocol for every document, then shut down.
    ///
    /// Returns `false` if the user cancelled; nothing is closed and the
    /// session keeps running.
    pub fn request_exit(&mut self) -> bool {
        let all: Vec<usize> = (0..self.tabs.len()).collect();
        if !self.confirm_batch(&all) {
            info!("Exit cancelled");
            return false;
        }
        self.shutdown();
        let removed = self.tabs.clear();
        self.delete_drafts(&removed);
        true
    }

    /// Stop both timers and write the session snapshot. Idempotent.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.preview_timer.cancel();
        self.autosave.stop();
        self.settings_dirty = true;
        self.save_settings_if_dirty();
        self.shut_down = true;
        info!(
            "Session shutdown complete ({} paths remembered)",
            self.settings.session.open_paths.len()
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    /// Run a selection-changing mutation with the switch notifications
    /// around it: outgoing notice, mutation, preview and statistics for the
    /// incoming document, then the completion notice.
    fn switch_with<R>(&mut self, change: impl FnOnce(&mut TabCollection) -> R) -> R {
        if let Some(outgoing) = self.tabs.current() {
            self.services.observer.on_tab_switching(outgoing);
        }
        let result = change(&mut self.tabs);
        self.refresh_current();
        self.services.observer.on_tab_switched(self.tabs.current());
        result
    }

    fn add_document(&mut self, document: Document, replace_empty: bool) {
        let added = self.switch_with(|tabs| tabs.add(document, replace_empty));
        if let Some(replaced) = added.replaced {
            self.delete_drafts(std::slice::from_ref(&replaced));
        }
    }

    /// Recompute statistics and preview for the current document now.
    fn refresh_current(&mut self) {
        self.stats = self
            .tabs
            .current()
            .map(|d| TextStats::from_text(d.content()))
            .unwrap_or_default();
        self.publish_preview();
    }

    fn publish_preview(&mut self) {
        self.preview_timer.cancel();
        self.preview_html = match self.tabs.current() {
            Some(document) => self.services.renderer.render(document.content()),
            None => String::new(),
        };
        self.services
            .observer
            .on_preview_published(&self.preview_html);
    }

    /// Confirm closing each listed document, stopping at the first cancel.
    fn confirm_batch(&mut self, indices: &[usize]) -> bool {
        for &index in indices {
            let Some(document) = self.tabs.get_mut(index) else {
                continue;
            };
            let outcome = confirm::confirm_close(
                document,
                &self.services.drafts,
                self.services.prompter.as_mut(),
                self.services.picker.as_mut(),
            );
            if !outcome.allows_close() {
                return false;
            }
            if let CloseOutcome::Saved(saved) = &outcome {
                self.record_saved(saved);
            }
        }
        self.save_settings_if_dirty();
        true
    }

    /// Delete the drafts of removed documents, reporting any left behind.
    fn delete_drafts(&mut self, documents: &[Document]) {
        let failed = documents
            .iter()
            .filter(|document| !self.services.drafts.delete(document))
            .count();
        match failed {
            0 => {}
            1 => self.status = "1 draft could not be removed".to_string(),
            n => self.status = format!("{} drafts could not be removed", n),
        }
    }

    /// Show the welcome state or a fresh document when no tabs remain.
    fn fill_if_empty(&mut self) {
        if !self.tabs.is_empty() {
            self.show_welcome = false;
            return;
        }
        if self.settings.show_welcome_screen {
            self.show_welcome = true;
        } else {
            self.add_document(Document::create_new(), false);
            self.show_welcome = false;
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
