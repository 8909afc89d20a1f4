//! Centralized error handling for Draftpad
//!
//! This module provides a unified error type that covers all error scenarios
//! in the application: document and draft I/O, session state,
//! configuration and the clipboard.

use log::warn;
use std::fmt;
use std::io;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Custom Result Type Alias
// ─────────────────────────────────────────────────────────────────────────────

/// A specialized `Result` type for the application.
pub type Result<T> = std::result::Result<T, Error>;

/// The centralized error type for the application.
#[derive(Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────
    // File I/O Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Failed to read a document from disk
    FileRead { path: PathBuf, source: io::Error },

    /// Failed to write a document to disk
    FileWrite { path: PathBuf, source: io::Error },

    /// Failed to write a recovery draft
    DraftWrite { path: PathBuf, source: io::Error },

    /// A remembered path no longer exists
    NotFound(PathBuf),

    // ─────────────────────────────────────────────────────────────────────────
    // Document State Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// The operation is not valid in the document's current state
    InvalidState(String),

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Failed to load configuration file
    ConfigLoad {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to save configuration file
    ConfigSave {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to parse configuration (invalid JSON/format)
    ConfigParse {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration directory not found or inaccessible
    ConfigDirNotFound,

    // ─────────────────────────────────────────────────────────────────────────
    // Clipboard Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// The system clipboard could not be opened or written
    Clipboard(String),

    // ─────────────────────────────────────────────────────────────────────────
    // Application Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Generic application error with a message
    Application(String),
}

impl Error {
    /// Whether this error means the target file is missing.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound(_) => true,
            Error::FileRead { source, .. } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

impl From<arboard::Error> for Error {
    fn from(err: arboard::Error) -> Self {
        Error::Clipboard(err.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Display trait implementation for user-friendly error messages
// ─────────────────────────────────────────────────────────────────────────────
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // File I/O Errors
            Error::FileRead { path, source } => {
                write!(f, "Failed to read '{}': {}", path.display(), source)
            }
            Error::FileWrite { path, source } => {
                write!(f, "Failed to write '{}': {}", path.display(), source)
            }
            Error::DraftWrite { path, source } => {
                write!(f, "Failed to write draft '{}': {}", path.display(), source)
            }
            Error::NotFound(path) => write!(f, "File not found: '{}'", path.display()),

            // Document State Errors
            Error::InvalidState(msg) => write!(f, "{}", msg),

            // Configuration Errors
            Error::ConfigLoad { path, source } => {
                write!(
                    f,
                    "Failed to load configuration from '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigSave { path, source } => {
                write!(
                    f,
                    "Failed to save configuration to '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigParse { message, .. } => {
                write!(f, "Invalid configuration format: {}", message)
            }
            Error::ConfigDirNotFound => {
                write!(f, "Configuration directory not found")
            }

            // Clipboard Errors
            Error::Clipboard(msg) => write!(f, "Clipboard error: {}", msg),

            // Application Errors
            Error::Application(msg) => write!(f, "{}", msg),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// std::error::Error trait implementation for error chaining
// ─────────────────────────────────────────────────────────────────────────────
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FileRead { source, .. }
            | Error::FileWrite { source, .. }
            | Error::DraftWrite { source, .. } => Some(source),
            Error::ConfigLoad { source, .. } => Some(source.as_ref()),
            Error::ConfigSave { source, .. } => Some(source.as_ref()),
            Error::ConfigParse { source, .. } => source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            Error::NotFound(_)
            | Error::InvalidState(_)
            | Error::ConfigDirNotFound
            | Error::Clipboard(_)
            | Error::Application(_) => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Graceful Degradation Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for Result to support graceful degradation.
pub trait ResultExt<T> {
    /// If the result is an error, log it at warning level and return the provided default.
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                warn!("{}: {}. Using default.", context, err);
                default
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_write_error() {
        let path = PathBuf::from("/test/file.md");
        let io_err = io::Error::new(io::ErrorKind::Other, "write failed");
        let err = Error::FileWrite {
            path: path.clone(),
            source: io_err,
        };
        assert!(matches!(err, Error::FileWrite { path: p, .. } if p == path));
    }

    #[test]
    fn test_invalid_state_display() {
        let err = Error::InvalidState("Cannot save without a path".to_string());
        assert_eq!(err.to_string(), "Cannot save without a path");
    }

    #[test]
    fn test_not_found_detection() {
        assert!(Error::NotFound(PathBuf::from("/gone.md")).is_not_found());

        let read = Error::FileRead {
            path: PathBuf::from("/gone.md"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert!(read.is_not_found());

        let denied = Error::FileRead {
            path: PathBuf::from("/locked.md"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(!denied.is_not_found());
    }

    #[test]
    fn test_draft_write_display_mentions_draft() {
        let err = Error::DraftWrite {
            path: PathBuf::from("/drafts/a.md_00.draft"),
            source: io::Error::new(io::ErrorKind::Other, "disk full"),
        };
        let msg = err.to_string();
        assert!(msg.contains("draft"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn test_clipboard_error_conversion() {
        let err = Error::from(arboard::Error::ContentNotAvailable);
        assert!(matches!(err, Error::Clipboard(_)));
        assert!(err.to_string().starts_with("Clipboard error:"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_display_config_dir_not_found() {
        let err = Error::ConfigDirNotFound;
        assert_eq!(err.to_string(), "Configuration directory not found");
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error as StdError;
        let err = Error::FileRead {
            path: PathBuf::from("/a.md"),
            source: io::Error::new(io::ErrorKind::Other, "boom"),
        };
        assert!(err.source().is_some());
        assert!(Error::InvalidState("x".into()).source().is_none());
        assert!(Error::NotFound(PathBuf::from("/a.md")).source().is_none());
    }

    #[test]
    fn test_unwrap_or_warn_default() {
        let ok: Result<i32> = Ok(42);
        assert_eq!(ok.unwrap_or_warn_default(0, "test context"), 42);

        let err: Result<i32> = Err(Error::Application("test".to_string()));
        assert_eq!(err.unwrap_or_warn_default(0, "test context"), 0);
    }
}
