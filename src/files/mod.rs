//! Platform integration: native dialogs and the system clipboard

mod clipboard;
mod dialogs;

pub use clipboard::SystemClipboard;
pub use dialogs::{RfdPathPicker, RfdPrompter};
