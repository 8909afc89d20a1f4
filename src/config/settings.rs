//! User settings and preferences for Draftpad
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options plus the remembered session, with serde support for JSON
//! persistence.

use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Window Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Window size and position configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    /// Window width in pixels
    pub width: f32,
    /// Window height in pixels
    pub height: f32,
    /// Window X position (None = system default)
    pub x: Option<f32>,
    /// Window Y position (None = system default)
    pub y: Option<f32>,
    /// Whether the window is maximized
    pub maximized: bool,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1400.0,
            height: 900.0,
            x: None,
            y: None,
            maximized: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Recent Files
// ─────────────────────────────────────────────────────────────────────────────

/// An entry in the recent-files list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentFile {
    pub path: PathBuf,
    #[serde(default)]
    pub last_opened: Option<DateTime<Utc>>,
}

impl RecentFile {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            last_opened: Some(Utc::now()),
        }
    }

    pub fn file_name(&self) -> String {
        paths::file_name_of(&self.path)
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Session Snapshot
// ─────────────────────────────────────────────────────────────────────────────

/// Paths that were open at shutdown, used to rebuild the tabs on next launch.
///
/// Only saved documents are listed; unsaved content is the drafts' job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSnapshot {
    /// Open document paths in tab order
    pub open_paths: Vec<PathBuf>,
    /// Index into `open_paths` of the selected document
    pub selected_index: usize,
}

impl SessionSnapshot {
    pub fn is_empty(&self) -> bool {
        self.open_paths.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// User preferences, recent files and the remembered session.
///
/// Serialized to JSON in the user's config directory. Every field has a
/// default, so partial or older files still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Editor
    // ─────────────────────────────────────────────────────────────────────────
    /// Font size for the editor (in points)
    pub editor_font_size: f32,

    /// Whether to enable word wrap
    pub word_wrap: bool,

    /// Whether to show line numbers in the editor
    pub show_line_numbers: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Preview & Drafts
    // ─────────────────────────────────────────────────────────────────────────
    /// Quiet period before the preview is regenerated, in milliseconds
    pub preview_delay_ms: u64,

    /// Whether dirty documents are periodically written to drafts
    pub auto_save: bool,

    /// Draft auto-save interval in seconds
    pub auto_save_interval_secs: u32,

    // ─────────────────────────────────────────────────────────────────────────
    // Session & History
    // ─────────────────────────────────────────────────────────────────────────
    /// Show the welcome screen instead of an empty document when no tabs are open
    pub show_welcome_screen: bool,

    /// Recently opened files (most recent first)
    pub recent_files: Vec<RecentFile>,

    /// Maximum number of recent files to remember
    pub max_recent_files: usize,

    /// Documents open at last shutdown
    pub session: SessionSnapshot,

    // ─────────────────────────────────────────────────────────────────────────
    // Window State
    // ─────────────────────────────────────────────────────────────────────────
    /// Window size and position
    pub window_size: WindowSize,

    /// Split ratio for the editor/preview panes (0.0 to 1.0)
    pub split_ratio: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Editor
            editor_font_size: 14.0,
            word_wrap: true,
            show_line_numbers: true,

            // Preview & Drafts
            preview_delay_ms: Self::DEFAULT_PREVIEW_DELAY_MS,
            auto_save: true,
            auto_save_interval_secs: Self::DEFAULT_AUTO_SAVE_INTERVAL_SECS,

            // Session & History
            show_welcome_screen: true,
            recent_files: Vec::new(),
            max_recent_files: Self::DEFAULT_MAX_RECENT_FILES,
            session: SessionSnapshot::default(),

            // Window State
            window_size: WindowSize::default(),
            split_ratio: 0.5,
        }
    }
}

impl Settings {
    /// Default preview debounce delay.
    pub const DEFAULT_PREVIEW_DELAY_MS: u64 = 300;
    /// Default draft auto-save interval.
    pub const DEFAULT_AUTO_SAVE_INTERVAL_SECS: u32 = 30;
    /// Default recent-files cap.
    pub const DEFAULT_MAX_RECENT_FILES: usize = 10;

    // ─────────────────────────────────────────────────────────────────────────
    // Recent Files
    // ─────────────────────────────────────────────────────────────────────────

    /// Add a file to the front of the recent files list.
    ///
    /// An existing entry for the same path (compared case-insensitively) is
    /// moved to the front. The list is trimmed to `max_recent_files`.
    pub fn add_recent_file(&mut self, path: PathBuf) {
        self.recent_files
            .retain(|r| !paths::same_path(&r.path, &path));
        self.recent_files.insert(0, RecentFile::new(path));
        self.recent_files.truncate(self.max_recent_files);
    }

    /// Remove a file from the recent files list.
    pub fn remove_recent_file(&mut self, path: &Path) {
        self.recent_files
            .retain(|r| !paths::same_path(&r.path, path));
    }

    /// Recent files that still exist on disk.
    pub fn existing_recent_files(&self) -> Vec<RecentFile> {
        self.recent_files
            .iter()
            .filter(|r| r.exists())
            .cloned()
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Minimum allowed font size.
    pub const MIN_FONT_SIZE: f32 = 8.0;
    /// Maximum allowed font size.
    pub const MAX_FONT_SIZE: f32 = 48.0;
    /// Minimum window dimension.
    pub const MIN_WINDOW_SIZE: f32 = 200.0;
    /// Maximum window dimension.
    pub const MAX_WINDOW_SIZE: f32 = 10000.0;
    /// Minimum auto-save interval.
    pub const MIN_AUTO_SAVE_INTERVAL_SECS: u32 = 5;
    /// Minimum preview delay.
    pub const MIN_PREVIEW_DELAY_MS: u64 = 50;
    /// Maximum preview delay.
    pub const MAX_PREVIEW_DELAY_MS: u64 = 5000;

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// This is useful after loading settings from a file that might have
    /// been manually edited with invalid values.
    pub fn sanitize(&mut self) {
        self.editor_font_size = self
            .editor_font_size
            .clamp(Self::MIN_FONT_SIZE, Self::MAX_FONT_SIZE);

        self.window_size.width = self
            .window_size
            .width
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
        self.window_size.height = self
            .window_size
            .height
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);

        self.split_ratio = self.split_ratio.clamp(0.0, 1.0);

        if self.max_recent_files == 0 {
            self.max_recent_files = Self::DEFAULT_MAX_RECENT_FILES;
        } else if self.max_recent_files > 100 {
            self.max_recent_files = 100;
        }
        self.recent_files.truncate(self.max_recent_files);

        if self.auto_save_interval_secs < Self::MIN_AUTO_SAVE_INTERVAL_SECS {
            self.auto_save_interval_secs = Self::MIN_AUTO_SAVE_INTERVAL_SECS;
        }

        self.preview_delay_ms = self
            .preview_delay_ms
            .clamp(Self::MIN_PREVIEW_DELAY_MS, Self::MAX_PREVIEW_DELAY_MS);

        let open = self.session.open_paths.len();
        if open == 0 {
            self.session.selected_index = 0;
        } else if self.session.selected_index >= open {
            self.session.selected_index = open - 1;
        }
    }

    /// Deserialize and then sanitize.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
