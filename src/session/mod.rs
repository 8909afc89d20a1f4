//! Document session management for Draftpad
//!
//! This module owns the set of open documents and everything that happens
//! to them between launch and exit: tab selection, close confirmation,
//! debounced preview updates, periodic draft writing and restoring the
//! previous session.

mod autosave;
mod collab;
mod confirm;
mod debounce;
mod manager;
mod reconcile;
mod tabs;

#[cfg(test)]
pub mod testing;

pub use collab::{
    Answer, Clipboard, OneOfThree, PathPicker, Prompter, Renderer, Services, SessionObserver,
};
pub use manager::SessionManager;
