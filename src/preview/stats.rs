//! Text statistics for the status bar
//!
//! Counts words, characters and lines of the current document. Recomputed
//! on every content change and on every tab switch.

// ─────────────────────────────────────────────────────────────────────────────
// TextStats
// ─────────────────────────────────────────────────────────────────────────────

/// Text statistics for a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextStats {
    /// Number of words (sequences of non-whitespace characters)
    pub words: usize,
    /// Number of characters including whitespace
    pub characters: usize,
    /// Number of characters excluding whitespace
    pub characters_no_spaces: usize,
    /// Number of lines (an empty document has one)
    pub lines: usize,
}

impl TextStats {
    /// Calculate statistics from the given text in a single pass.
    pub fn from_text(text: &str) -> Self {
        let mut stats = Self {
            lines: 1,
            ..Self::default()
        };
        let mut in_word = false;

        for ch in text.chars() {
            stats.characters += 1;

            if ch.is_whitespace() {
                in_word = false;
                if ch == '\n' {
                    stats.lines += 1;
                }
            } else {
                stats.characters_no_spaces += 1;
                if !in_word {
                    in_word = true;
                    stats.words += 1;
                }
            }
        }

        stats
    }

    /// Compact status bar text, e.g. "150 words | 892 chars | 25 lines".
    pub fn format_compact(&self) -> String {
        format!(
            "{} words | {} chars | {} lines",
            self.words, self.characters, self.lines
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
