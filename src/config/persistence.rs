//! Settings ledger persistence for Draftpad
//!
//! This module handles loading and saving the settings file in the
//! platform-specific config directory with graceful fallback to defaults.
//! The file is always rewritten wholesale.

use crate::config::Settings;
use crate::error::{Error, Result, ResultExt};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Backup configuration file name (used during atomic writes)
const CONFIG_BACKUP_NAME: &str = "config.json.bak";

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Directory Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Get the platform-specific configuration directory for the application.
///
/// - **Windows**: `%APPDATA%\draftpad\`
/// - **macOS**: `~/Library/Application Support/draftpad/`
/// - **Linux**: `~/.config/draftpad/`
///
/// # Errors
///
/// Returns `Error::ConfigDirNotFound` if the config directory cannot be determined
/// (e.g., if the HOME environment variable is not set).
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|base| base.join(crate::APP_DIR_NAME))
        .ok_or(Error::ConfigDirNotFound)
}

// ─────────────────────────────────────────────────────────────────────────────
// Ledger Boundary
// ─────────────────────────────────────────────────────────────────────────────

/// Persistent store for [`Settings`].
///
/// `load` never fails: anything unreadable yields defaults. `save` reports
/// failures, which callers treat as best-effort.
pub trait SettingsLedger {
    fn load(&self) -> Settings;
    fn save(&self, settings: &Settings) -> Result<()>;
}

/// Settings ledger backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileLedger {
    dir: PathBuf,
}

impl JsonFileLedger {
    /// Ledger storing `config.json` inside `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Ledger in the platform config directory.
    pub fn at_default_location() -> Result<Self> {
        Ok(Self::new(get_config_dir()?))
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE_NAME)
    }

    fn load_internal(&self) -> Result<Settings> {
        let config_path = self.config_path();

        if !config_path.exists() {
            debug!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Settings::default());
        }

        debug!("Loading config from: {}", config_path.display());

        let contents = fs::read_to_string(&config_path).map_err(|e| Error::ConfigLoad {
            path: config_path.clone(),
            source: Box::new(e),
        })?;

        if contents.trim().is_empty() {
            debug!("Config file is empty, using defaults");
            return Ok(Settings::default());
        }

        let settings = Settings::from_json_sanitized(&contents).map_err(|e| {
            warn!(
                "Config file at {} contains invalid JSON: {}",
                config_path.display(),
                e
            );
            Error::ConfigParse {
                message: format!("Failed to parse config file: {}", e),
                source: Some(Box::new(e)),
            }
        })?;

        info!(
            "Configuration loaded successfully from {}",
            config_path.display()
        );
        Ok(settings)
    }

    fn ensure_dir(&self) -> Result<&Path> {
        if !self.dir.exists() {
            debug!("Creating config directory: {}", self.dir.display());
            fs::create_dir_all(&self.dir).map_err(|e| Error::ConfigSave {
                path: self.dir.clone(),
                source: Box::new(e),
            })?;
        }
        Ok(&self.dir)
    }
}

impl SettingsLedger for JsonFileLedger {
    fn load(&self) -> Settings {
        self.load_internal()
            .unwrap_or_warn_default(Settings::default(), "Failed to load configuration")
    }

    /// Atomic save: write the backup file, then rename it over the original.
    fn save(&self, settings: &Settings) -> Result<()> {
        let config_dir = self.ensure_dir()?;
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let backup_path = config_dir.join(CONFIG_BACKUP_NAME);

        debug!("Saving config to: {}", config_path.display());

        let json = serde_json::to_string_pretty(settings).map_err(|e| Error::ConfigSave {
            path: config_path.clone(),
            source: Box::new(e),
        })?;

        fs::write(&backup_path, &json).map_err(|e| Error::ConfigSave {
            path: backup_path.clone(),
            source: Box::new(e),
        })?;

        fs::rename(&backup_path, &config_path).map_err(|e| Error::ConfigSave {
            path: config_path.clone(),
            source: Box::new(e),
        })?;

        info!(
            "Configuration saved successfully to {}",
            config_path.display()
        );
        Ok(())
    }
}

/// Load settings from the default location, falling back to defaults.
pub fn load_config() -> Settings {
    match JsonFileLedger::at_default_location() {
        Ok(ledger) => ledger.load(),
        Err(e) => {
            warn!("{}. Using default settings.", e);
            Settings::default()
        }
    }
}

/// Save settings through a ledger, logging instead of failing.
///
/// Returns `true` if the save was successful.
pub fn save_config_silent(ledger: &dyn SettingsLedger, settings: &Settings) -> bool {
    match ledger.save(settings) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to save configuration: {}", e);
            false
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
