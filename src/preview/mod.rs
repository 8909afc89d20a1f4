//! Preview generation for Draftpad
//!
//! This module turns document text into the HTML shown in the preview pane,
//! exports that HTML as a standalone file and computes the statistics shown
//! in the status bar.

mod export;
mod render;
mod stats;

pub use export::write_html_document;
pub use render::ComrakRenderer;
pub use stats::TextStats;
