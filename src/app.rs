//! Main application module for Draftpad
//!
//! This module implements the eframe App trait. It renders the tab strip,
//! editor, preview and status bar, and forwards every user action to the
//! [`SessionManager`], which owns the documents.

use crate::config::{JsonFileLedger, Settings, SettingsLedger, WindowSize};
use crate::document::Document;
use crate::drafts::DraftStore;
use crate::files::{RfdPathPicker, RfdPrompter, SystemClipboard};
use crate::preview::ComrakRenderer;
use crate::session::{Services, SessionManager, SessionObserver};
use eframe::egui;
use log::{debug, info, warn};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

/// User actions collected while rendering and executed afterwards to avoid
/// borrow conflicts with the UI closures.
#[derive(Debug, Clone)]
enum Action {
    /// New document (Ctrl+N)
    New,
    /// Open file dialog (Ctrl+O)
    Open,
    /// Open an entry from the recent-files list
    OpenRecent(PathBuf),
    /// Save current file (Ctrl+S)
    Save,
    /// Save As dialog (Ctrl+Shift+S)
    SaveAs,
    /// Select a tab by index
    SelectTab(usize),
    /// Close a tab by index
    CloseTab(usize),
    /// Close current tab (Ctrl+W)
    CloseCurrent,
    /// Close all but the current tab
    CloseOthers,
    /// Close all tabs (Ctrl+Shift+W)
    CloseAll,
    /// Next tab (Ctrl+Tab)
    NextTab,
    /// Previous tab (Ctrl+Shift+Tab)
    PrevTab,
    /// Undo (Ctrl+Z)
    Undo,
    /// Redo (Ctrl+Y or Ctrl+Shift+Z)
    Redo,
    /// Discard in-memory edits of the current document
    Revert,
    /// Export the preview as HTML (Ctrl+Shift+E)
    ExportHtml,
    /// Copy the current document's path to the clipboard
    CopyPath,
    /// Toggle the settings window (Ctrl+,)
    ToggleSettings,
    /// Run the exit protocol and close the window
    Exit,
}

// ─────────────────────────────────────────────────────────────────────────────
// Editor Pane
// ─────────────────────────────────────────────────────────────────────────────

/// Text shown in the editor and preview widgets.
///
/// The session pushes into this through [`PaneObserver`]; the UI edits
/// `buffer` directly and reports changes back to the session.
#[derive(Debug, Default)]
struct EditorPane {
    buffer: String,
    preview_html: String,
}

/// Forwards session notifications to the shared [`EditorPane`].
struct PaneObserver(Rc<RefCell<EditorPane>>);

impl SessionObserver for PaneObserver {
    fn on_tab_switching(&mut self, outgoing: &Document) {
        debug!("Leaving tab: {}", outgoing.display_path());
    }

    fn on_tab_switched(&mut self, incoming: Option<&Document>) {
        let mut pane = self.0.borrow_mut();
        pane.buffer = incoming
            .map(|d| d.content().to_string())
            .unwrap_or_default();
    }

    fn on_content_reloaded(&mut self, document: &Document) {
        self.0.borrow_mut().buffer = document.content().to_string();
    }

    fn on_preview_published(&mut self, html: &str) {
        self.0.borrow_mut().preview_html = html.to_string();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Application
// ─────────────────────────────────────────────────────────────────────────────

/// The main application struct that holds all state and implements eframe::App.
pub struct DraftpadApp {
    /// Owner of all open documents
    session: SessionManager,
    /// Editor and preview text shared with the session observer
    pane: Rc<RefCell<EditorPane>>,
    /// Whether the settings window is open
    show_settings: bool,
    /// Track if we should exit (after confirmation)
    should_exit: bool,
    /// Last title sent to the viewport
    last_title: String,
    /// Last known window size (for detecting changes)
    last_window_size: Option<egui::Vec2>,
    /// Last known window position (for detecting changes)
    last_window_pos: Option<egui::Pos2>,
}

impl DraftpadApp {
    /// Create the application and populate the initial tabs.
    ///
    /// `startup_path` comes from the command line and takes precedence over
    /// the remembered session.
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        settings: Settings,
        startup_path: Option<PathBuf>,
    ) -> Self {
        info!("Initializing {}", crate::APP_NAME);

        let pane = Rc::new(RefCell::new(EditorPane::default()));
        let services = Services {
            ledger: default_ledger(),
            drafts: default_drafts(),
            renderer: Box::new(ComrakRenderer::default()),
            picker: Box::new(RfdPathPicker::new()),
            prompter: Box::new(RfdPrompter),
            observer: Box::new(PaneObserver(Rc::clone(&pane))),
            clipboard: Box::new(SystemClipboard),
        };

        let mut session = SessionManager::new(settings, services, Instant::now());
        let report = session.initialize(startup_path);
        if report.restored > 0 || !report.missing.is_empty() {
            info!(
                "Restored {} documents ({} from drafts, {} missing)",
                report.restored,
                report.recovered,
                report.missing.len()
            );
        }

        Self {
            session,
            pane,
            show_settings: false,
            should_exit: false,
            last_title: String::new(),
            last_window_size: None,
            last_window_pos: None,
        }
    }

    /// Send the window title to the viewport when it changes.
    fn update_title(&mut self, ctx: &egui::Context) {
        let title = self.session.window_title();
        if title != self.last_title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.last_title = title;
        }
    }

    /// Update window size in settings if changed.
    ///
    /// Returns `true` if the window state was updated.
    fn update_window_state(&mut self, ctx: &egui::Context) -> bool {
        let mut changed = false;

        ctx.input(|i| {
            if let Some(rect) = i.viewport().outer_rect {
                let current_size = rect.size();
                let current_pos = rect.min;

                let size_changed = self
                    .last_window_size
                    .map(|s| (s - current_size).length() > 1.0)
                    .unwrap_or(true);
                let pos_changed = self
                    .last_window_pos
                    .map(|p| (p - current_pos).length() > 1.0)
                    .unwrap_or(true);

                if size_changed || pos_changed {
                    self.last_window_size = Some(current_size);
                    self.last_window_pos = Some(current_pos);
                    changed = true;
                }
            }
        });

        if changed {
            if let (Some(size), Some(pos)) = (self.last_window_size, self.last_window_pos) {
                let maximized = ctx.input(|i| i.viewport().maximized.unwrap_or(false));
                let window_size = WindowSize {
                    width: size.x,
                    height: size.y,
                    x: Some(pos.x),
                    y: Some(pos.y),
                    maximized,
                };
                self.session
                    .update_settings(|s| s.window_size = window_size);

                debug!(
                    "Window state updated: {}x{} at ({}, {}), maximized: {}",
                    size.x, size.y, pos.x, pos.y, maximized
                );
            }
        }

        changed
    }

    /// Handle close request from the window.
    ///
    /// Returns `true` if the application should close.
    fn handle_close_request(&mut self) -> bool {
        if self.should_exit {
            return true;
        }
        if self.session.request_exit() {
            self.should_exit = true;
        }
        self.should_exit
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Input
    // ─────────────────────────────────────────────────────────────────────────

    /// Consume keyboard shortcuts before the editor sees them.
    ///
    /// More specific combinations are checked first because a plain
    /// Ctrl pattern also matches when Shift is held.
    fn handle_keyboard_shortcuts(&self, ctx: &egui::Context) -> Option<Action> {
        use egui::{Key, Modifiers};
        let ctrl_shift = Modifiers::COMMAND | Modifiers::SHIFT;

        ctx.input_mut(|i| {
            let shortcuts = [
                (ctrl_shift, Key::S, Action::SaveAs),
                (ctrl_shift, Key::Tab, Action::PrevTab),
                (ctrl_shift, Key::Z, Action::Redo),
                (ctrl_shift, Key::W, Action::CloseAll),
                (ctrl_shift, Key::E, Action::ExportHtml),
                (Modifiers::COMMAND, Key::S, Action::Save),
                (Modifiers::COMMAND, Key::O, Action::Open),
                (Modifiers::COMMAND, Key::N, Action::New),
                (Modifiers::COMMAND, Key::W, Action::CloseCurrent),
                (Modifiers::COMMAND, Key::Tab, Action::NextTab),
                (Modifiers::COMMAND, Key::Z, Action::Undo),
                (Modifiers::COMMAND, Key::Y, Action::Redo),
                (Modifiers::COMMAND, Key::Comma, Action::ToggleSettings),
            ];
            shortcuts
                .into_iter()
                .find(|(modifiers, key, _)| i.consume_key(*modifiers, *key))
                .map(|(_, key, action)| {
                    debug!("Keyboard shortcut: {:?} -> {:?}", key, action);
                    action
                })
        })
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::New => self.session.new_document(),
            Action::Open => {
                self.session.open_via_picker();
            }
            Action::OpenRecent(path) => {
                self.session.open_recent(&path);
            }
            Action::Save => {
                self.session.save_current();
            }
            Action::SaveAs => {
                self.session.save_current_as();
            }
            Action::SelectTab(index) => {
                self.session.select_tab(index);
            }
            Action::CloseTab(index) => {
                self.session.close_tab(index);
            }
            Action::CloseCurrent => {
                self.session.close_current();
            }
            Action::CloseOthers => {
                self.session.close_others();
            }
            Action::CloseAll => {
                self.session.close_all();
            }
            Action::NextTab => self.session.select_next(),
            Action::PrevTab => self.session.select_previous(),
            Action::Undo => {
                self.session.undo_current();
            }
            Action::Redo => {
                self.session.redo_current();
            }
            Action::Revert => {
                self.session.revert_current();
            }
            Action::ExportHtml => {
                self.session.export_html();
            }
            Action::CopyPath => {
                self.session.copy_current_path();
            }
            Action::ToggleSettings => self.show_settings = !self.show_settings,
            Action::Exit => {
                self.handle_close_request();
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────

    /// Render the main UI. Returns actions to run after rendering.
    fn render_ui(&mut self, ctx: &egui::Context) -> Vec<Action> {
        let mut actions = Vec::new();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.render_toolbar(ui, &mut actions);
        });

        if !self.session.tabs().is_empty() {
            egui::TopBottomPanel::top("tab_strip").show(ctx, |ui| {
                self.render_tab_strip(ui, &mut actions);
            });
        }

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.session.status_text());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if self.session.current().is_some() {
                        ui.label(self.session.stats().format_compact());
                    }
                });
            });
        });

        if self.session.show_welcome() || self.session.tabs().is_empty() {
            egui::CentralPanel::default().show(ctx, |ui| {
                self.render_welcome(ui, &mut actions);
            });
            return actions;
        }

        let preview_width = ctx.screen_rect().width() * (1.0 - self.session.settings().split_ratio);
        egui::SidePanel::right("preview")
            .resizable(true)
            .default_width(preview_width)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("HTML Output");
                    if ui
                        .small_button("Export")
                        .on_hover_text("Save as a standalone HTML page (Ctrl+Shift+E)")
                        .clicked()
                    {
                        actions.push(Action::ExportHtml);
                    }
                });
                ui.label(
                    egui::RichText::new("Generated HTML source, updated as you type")
                        .small()
                        .weak(),
                );
                ui.separator();
                egui::ScrollArea::vertical()
                    .id_source("preview_scroll")
                    .show(ui, |ui| {
                        let pane = self.pane.borrow();
                        let mut html = pane.preview_html.as_str();
                        ui.add(
                            egui::TextEdit::multiline(&mut html)
                                .code_editor()
                                .desired_width(f32::INFINITY),
                        );
                    });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_editor(ui);
        });

        actions
    }

    fn render_toolbar(&self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        let has_document = self.session.current().is_some();
        let can_undo = self.session.current().map(Document::can_undo).unwrap_or(false);
        let can_redo = self.session.current().map(Document::can_redo).unwrap_or(false);
        let is_dirty = self.session.current().map(Document::is_dirty).unwrap_or(false);

        ui.horizontal(|ui| {
            if ui.button("New").clicked() {
                actions.push(Action::New);
            }
            if ui.button("Open").clicked() {
                actions.push(Action::Open);
            }
            if ui.add_enabled(has_document, egui::Button::new("Save")).clicked() {
                actions.push(Action::Save);
            }
            if ui.add_enabled(has_document, egui::Button::new("Save As")).clicked() {
                actions.push(Action::SaveAs);
            }
            ui.separator();
            if ui.add_enabled(has_document, egui::Button::new("Close")).clicked() {
                actions.push(Action::CloseCurrent);
            }
            if ui.add_enabled(has_document, egui::Button::new("Close Others")).clicked() {
                actions.push(Action::CloseOthers);
            }
            if ui.add_enabled(has_document, egui::Button::new("Close All")).clicked() {
                actions.push(Action::CloseAll);
            }
            ui.separator();
            if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                actions.push(Action::Undo);
            }
            if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                actions.push(Action::Redo);
            }
            if ui.add_enabled(is_dirty, egui::Button::new("Revert")).clicked() {
                actions.push(Action::Revert);
            }
            ui.separator();
            if ui
                .add_enabled(has_document, egui::Button::new("Export HTML"))
                .clicked()
            {
                actions.push(Action::ExportHtml);
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Exit").clicked() {
                    actions.push(Action::Exit);
                }
                if ui.button("Settings").clicked() {
                    actions.push(Action::ToggleSettings);
                }
            });
        });
    }

    fn render_tab_strip(&self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        let selected = self.session.selected_index();
        egui::ScrollArea::horizontal()
            .id_source("tab_strip_scroll")
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    for (index, document) in self.session.tabs().documents().iter().enumerate() {
                        let response = ui
                            .selectable_label(selected == Some(index), document.title())
                            .on_hover_text(tab_tooltip(document));
                        if response.clicked() {
                            actions.push(Action::SelectTab(index));
                        }
                        if response.middle_clicked() {
                            actions.push(Action::CloseTab(index));
                        }
                        response.context_menu(|ui| {
                            if ui.button("Close").clicked() {
                                actions.push(Action::CloseTab(index));
                                ui.close_menu();
                            }
                            if ui.button("Close Others").clicked() {
                                actions.push(Action::SelectTab(index));
                                actions.push(Action::CloseOthers);
                                ui.close_menu();
                            }
                            if ui.button("Close All").clicked() {
                                actions.push(Action::CloseAll);
                                ui.close_menu();
                            }
                            ui.separator();
                            let has_path = document.path().is_some();
                            if ui
                                .add_enabled(has_path, egui::Button::new("Copy Path"))
                                .clicked()
                            {
                                actions.push(Action::SelectTab(index));
                                actions.push(Action::CopyPath);
                                ui.close_menu();
                            }
                        });
                        if ui.small_button("×").clicked() {
                            actions.push(Action::CloseTab(index));
                        }
                        ui.separator();
                    }
                });
            });
    }

    fn render_welcome(&self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.heading(crate::APP_NAME);
            ui.label("Create a new document or open an existing file.");
            ui.add_space(12.0);
            ui.horizontal(|ui| {
                if ui.button("New Document").clicked() {
                    actions.push(Action::New);
                }
                if ui.button("Open File…").clicked() {
                    actions.push(Action::Open);
                }
            });

            let recent = self.session.recent_files();
            if !recent.is_empty() {
                ui.add_space(24.0);
                ui.label(egui::RichText::new("Recent Files").strong());
                for file in recent {
                    let label = match file.last_opened {
                        Some(when) => format!(
                            "{}  ({})",
                            file.file_name(),
                            when.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M")
                        ),
                        None => file.file_name(),
                    };
                    if ui
                        .link(label)
                        .on_hover_text(file.path.display().to_string())
                        .clicked()
                    {
                        actions.push(Action::OpenRecent(file.path.clone()));
                    }
                }
            }
        });
    }

    /// Editor with optional line-number gutter. Edits go to the session
    /// after the pane borrow is released.
    fn render_editor(&mut self, ui: &mut egui::Ui) {
        let Some(document_id) = self.session.current().map(Document::id) else {
            return;
        };
        let settings = self.session.settings();
        let font = egui::FontId::monospace(settings.editor_font_size);
        let word_wrap = settings.word_wrap;
        let show_line_numbers = settings.show_line_numbers;
        let line_count = self.session.stats().lines;

        let mut no_wrap = |ui: &egui::Ui, text: &str, _wrap_width: f32| -> Arc<egui::Galley> {
            let job = egui::text::LayoutJob::simple(
                text.to_owned(),
                font.clone(),
                ui.visuals().text_color(),
                f32::INFINITY,
            );
            ui.fonts(|f| f.layout_job(job))
        };

        let edited = egui::ScrollArea::both()
            .id_source(("editor_scroll", document_id))
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.horizontal_top(|ui| {
                    if show_line_numbers {
                        let numbers = (1..=line_count.max(1))
                            .map(|n| n.to_string())
                            .collect::<Vec<_>>()
                            .join("\n");
                        ui.label(
                            egui::RichText::new(numbers)
                                .font(font.clone())
                                .color(ui.visuals().weak_text_color()),
                        );
                    }

                    let mut pane = self.pane.borrow_mut();
                    let mut editor = egui::TextEdit::multiline(&mut pane.buffer)
                        .id(egui::Id::new(("editor", document_id)))
                        .font(font.clone())
                        .desired_width(f32::INFINITY)
                        .lock_focus(true)
                        .frame(false);
                    if !word_wrap {
                        editor = editor.layouter(&mut no_wrap);
                    }
                    let response = ui.add(editor);
                    response.changed().then(|| pane.buffer.clone())
                })
                .inner
            })
            .inner;

        if let Some(text) = edited {
            self.session.on_content_changed(&text, Instant::now());
        }
    }

    /// Settings window. Changes are applied through the session so the
    /// live timers follow them.
    fn render_settings_window(&mut self, ctx: &egui::Context) {
        if !self.show_settings {
            return;
        }
        let current = self.session.settings().clone();
        let mut edited = current.clone();
        let mut open = self.show_settings;

        egui::Window::new("Settings")
            .open(&mut open)
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| {
                ui.heading("Drafts");
                ui.checkbox(&mut edited.auto_save, "Write recovery drafts automatically");
                ui.add(
                    egui::Slider::new(
                        &mut edited.auto_save_interval_secs,
                        Settings::MIN_AUTO_SAVE_INTERVAL_SECS..=600,
                    )
                    .text("Draft interval (s)"),
                );
                ui.add(
                    egui::Slider::new(
                        &mut edited.preview_delay_ms,
                        Settings::MIN_PREVIEW_DELAY_MS..=Settings::MAX_PREVIEW_DELAY_MS,
                    )
                    .text("Preview delay (ms)"),
                );

                ui.separator();
                ui.heading("Editor");
                ui.add(
                    egui::Slider::new(
                        &mut edited.editor_font_size,
                        Settings::MIN_FONT_SIZE..=Settings::MAX_FONT_SIZE,
                    )
                    .text("Font size"),
                );
                ui.checkbox(&mut edited.word_wrap, "Word wrap");
                ui.checkbox(&mut edited.show_line_numbers, "Line numbers");
                ui.checkbox(
                    &mut edited.show_welcome_screen,
                    "Show welcome screen when no documents are open",
                );
            });
        self.show_settings = open;

        if edited.auto_save != current.auto_save
            || edited.auto_save_interval_secs != current.auto_save_interval_secs
        {
            self.session.set_auto_save(
                edited.auto_save,
                edited.auto_save_interval_secs,
                Instant::now(),
            );
        }
        if edited.preview_delay_ms != current.preview_delay_ms {
            self.session.set_preview_delay(edited.preview_delay_ms);
        }
        if edited.editor_font_size != current.editor_font_size
            || edited.word_wrap != current.word_wrap
            || edited.show_line_numbers != current.show_line_numbers
            || edited.show_welcome_screen != current.show_welcome_screen
        {
            self.session.update_settings(|s| {
                s.editor_font_size = edited.editor_font_size;
                s.word_wrap = edited.word_wrap;
                s.show_line_numbers = edited.show_line_numbers;
                s.show_welcome_screen = edited.show_welcome_screen;
            });
        }
    }
}

impl eframe::App for DraftpadApp {
    /// Called each time the UI needs repainting.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Fire due timers before drawing so the frame shows their results
        self.session.poll(Instant::now());

        self.update_title(ctx);
        self.update_window_state(ctx);

        if ctx.input(|i| i.viewport().close_requested()) && !self.handle_close_request() {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
        }

        let shortcut = self.handle_keyboard_shortcuts(ctx);
        let actions = self.render_ui(ctx);
        for action in shortcut.into_iter().chain(actions) {
            self.handle_action(action);
        }
        self.render_settings_window(ctx);

        if self.should_exit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        if let Some(deadline) = self.session.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(Instant::now()));
        }
    }

    /// Called when the application is about to close.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application exiting");
        self.session.shutdown();
    }

    /// Save persistent state.
    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        debug!("Saving application state");
        self.session.save_settings_if_dirty();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helper Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Full path plus the last save and draft times, if any.
fn tab_tooltip(document: &Document) -> String {
    let mut lines = vec![document.display_path()];
    if let Some(saved) = document.last_saved() {
        lines.push(format!("Saved at {}", saved.format("%H:%M:%S")));
    }
    if let Some(drafted) = document.last_auto_saved() {
        lines.push(format!("Draft saved at {}", drafted.format("%H:%M:%S")));
    }
    lines.join("\n")
}

fn fallback_dir() -> PathBuf {
    std::env::temp_dir().join(crate::APP_DIR_NAME)
}

fn default_ledger() -> Box<dyn SettingsLedger> {
    match JsonFileLedger::at_default_location() {
        Ok(ledger) => Box::new(ledger),
        Err(e) => {
            warn!("{}; keeping settings in {}", e, fallback_dir().display());
            Box::new(JsonFileLedger::new(fallback_dir()))
        }
    }
}

fn default_drafts() -> DraftStore {
    DraftStore::at_default_location().unwrap_or_else(|e| {
        let dir = fallback_dir().join("drafts");
        warn!("{}; writing drafts to {}", e, dir.display());
        DraftStore::new(dir)
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pane_holds_html_source_and_current_text() {
        let pane = Rc::new(RefCell::new(EditorPane::default()));
        let mut observer = PaneObserver(Rc::clone(&pane));
        let mut document = Document::create_new();
        document.set_content("# Title");

        observer.on_tab_switched(Some(&document));
        observer.on_preview_published("<h1>Title</h1>\n");
        assert_eq!(pane.borrow().buffer, "# Title");
        assert_eq!(pane.borrow().preview_html, "<h1>Title</h1>\n");

        observer.on_tab_switched(None);
        assert!(pane.borrow().buffer.is_empty());
    }
}
