//! Markdown rendering via comrak
//!
//! The session layer only sees the [`Renderer`] boundary; this is the
//! production implementation behind it.

use crate::session::Renderer;
use comrak::{markdown_to_html, Options};

// ─────────────────────────────────────────────────────────────────────────────
// Render Options
// ─────────────────────────────────────────────────────────────────────────────

/// Markdown extensions enabled for the preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Enable GitHub Flavored Markdown tables
    pub tables: bool,
    /// Enable strikethrough syntax (~~text~~)
    pub strikethrough: bool,
    /// Enable autolink URLs and emails
    pub autolink: bool,
    /// Enable task lists (- [ ] and - [x])
    pub tasklist: bool,
    /// Enable footnotes
    pub footnotes: bool,
    /// Skip a leading front matter block delimited by this marker
    pub front_matter_delimiter: Option<String>,
    /// Pass raw HTML through instead of escaping it
    pub allow_raw_html: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            autolink: true,
            tasklist: true,
            footnotes: true,
            front_matter_delimiter: Some("---".to_string()),
            allow_raw_html: false,
        }
    }
}

impl RenderOptions {
    fn to_comrak_options(&self) -> Options {
        let mut options = Options::default();

        // Extension options
        options.extension.strikethrough = self.strikethrough;
        options.extension.table = self.tables;
        options.extension.autolink = self.autolink;
        options.extension.tasklist = self.tasklist;
        options.extension.footnotes = self.footnotes;
        options.extension.front_matter_delimiter = self.front_matter_delimiter.clone();
        options.extension.header_ids = Some(String::new());

        // Render options
        options.render.unsafe_ = self.allow_raw_html;

        options
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Renderer
// ─────────────────────────────────────────────────────────────────────────────

/// Markdown-to-HTML renderer backed by comrak.
///
/// Stateless apart from its options; rendering the same text twice yields
/// the same HTML.
#[derive(Debug, Clone)]
pub struct ComrakRenderer {
    options: Options,
}

impl ComrakRenderer {
    pub fn new(options: &RenderOptions) -> Self {
        Self {
            options: options.to_comrak_options(),
        }
    }
}

impl Default for ComrakRenderer {
    fn default() -> Self {
        Self::new(&RenderOptions::default())
    }
}

impl Renderer for ComrakRenderer {
    fn render(&self, markdown: &str) -> String {
        markdown_to_html(markdown, &self.options)
    }
}
