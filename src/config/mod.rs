//! Configuration module for Draftpad
//!
//! This module handles user preferences, recent files and the remembered
//! session, including JSON serialization and persistent storage in the
//! platform-specific config directory.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;
