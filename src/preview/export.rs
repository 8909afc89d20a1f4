//! Standalone HTML export
//!
//! Wraps preview HTML in a complete document with a small inline stylesheet
//! so the exported file reads well in any browser.

use crate::error::{Error, Result};
use log::info;
use std::path::Path;

// ─────────────────────────────────────────────────────────────────────────────
// Document Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Build a complete HTML document around an already rendered `body`.
pub fn html_document(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generator" content="Draftpad">
    <title>{title}</title>
    <style>
{base_css}
    </style>
</head>
<body>
    <article class="markdown-body">
{body}
    </article>
</body>
</html>
"#,
        title = html_escape(title),
        base_css = BASE_CSS,
        body = body,
    )
}

/// Write `body` as a standalone HTML document to `path`.
pub fn write_html_document(path: &Path, title: &str, body: &str) -> Result<()> {
    std::fs::write(path, html_document(title, body)).map_err(|source| Error::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Exported HTML to {}", path.display());
    Ok(())
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ─────────────────────────────────────────────────────────────────────────────
// CSS
// ─────────────────────────────────────────────────────────────────────────────

/// Layout and typography for exported documents.
const BASE_CSS: &str = r#"
*, *::before, *::after {
    box-sizing: border-box;
}

body {
    margin: 0;
    padding: 0;
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
    font-size: 16px;
    line-height: 1.6;
    color: #24292f;
    background-color: #ffffff;
}

.markdown-body {
    max-width: 900px;
    margin: 0 auto;
    padding: 32px 24px;
}

.markdown-body h1,
.markdown-body h2,
.markdown-body h3 {
    margin-top: 24px;
    margin-bottom: 16px;
    font-weight: 600;
    line-height: 1.25;
}

.markdown-body h1 { font-size: 2em; border-bottom: 1px solid #d0d7de; padding-bottom: 0.3em; }
.markdown-body h2 { font-size: 1.5em; border-bottom: 1px solid #d0d7de; padding-bottom: 0.3em; }

.markdown-body blockquote {
    margin: 0 0 16px 0;
    padding: 0 1em;
    color: #57606a;
    border-left: 4px solid #d0d7de;
}

.markdown-body code {
    font-family: 'JetBrains Mono', 'Fira Code', 'Consolas', 'Monaco', monospace;
    font-size: 0.9em;
    padding: 0.2em 0.4em;
    border-radius: 4px;
    background-color: #f6f8fa;
}

.markdown-body pre {
    padding: 16px;
    overflow: auto;
    border-radius: 6px;
    background-color: #f6f8fa;
}

.markdown-body pre code {
    padding: 0;
}

.markdown-body table {
    border-collapse: collapse;
    margin-bottom: 16px;
}

.markdown-body th,
.markdown-body td {
    padding: 6px 13px;
    border: 1px solid #d0d7de;
}
"#;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
