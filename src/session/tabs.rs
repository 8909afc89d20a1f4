//! Ordered collection of open documents
//!
//! Pure bookkeeping: insertion order is tab order and at most one document
//! is selected. Side effects of a selection change (preview, statistics,
//! editor notifications) belong to the session manager.

use crate::document::Document;
use log::debug;
use std::path::Path;

/// Result of adding a document to the collection.
#[derive(Debug)]
pub struct Added {
    /// Index of the added document, which is now selected
    pub index: usize,
    /// The untouched empty document that was overwritten, if any
    pub replaced: Option<Document>,
}

/// Open documents plus the selected index.
///
/// The selection is `None` exactly when the collection is empty.
#[derive(Debug, Default)]
pub struct TabCollection {
    documents: Vec<Document>,
    selected: Option<usize>,
}

impl TabCollection {
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn documents_mut(&mut self) -> impl Iterator<Item = &mut Document> {
        self.documents.iter_mut()
    }

    pub fn get(&self, index: usize) -> Option<&Document> {
        self.documents.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Document> {
        self.documents.get_mut(index)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn current(&self) -> Option<&Document> {
        self.selected.and_then(|i| self.documents.get(i))
    }

    pub fn current_mut(&mut self) -> Option<&mut Document> {
        self.selected.and_then(|i| self.documents.get_mut(i))
    }

    /// Index of the document open at `path` (case-insensitive).
    pub fn find_by_path(&self, path: &Path) -> Option<usize> {
        self.documents.iter().position(|d| d.has_path(path))
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.documents.iter().any(Document::is_dirty)
    }

    /// Whether the selected document may be overwritten by the next open.
    pub fn can_replace_current(&self) -> bool {
        self.current().map(Document::is_replaceable).unwrap_or(false)
    }

    /// Index after the selected one, wrapping around. `None` with fewer
    /// than two tabs.
    pub fn next_index(&self) -> Option<usize> {
        let count = self.len();
        match self.selected {
            Some(i) if count > 1 => Some((i + 1) % count),
            _ => None,
        }
    }

    /// Index before the selected one, wrapping around. `None` with fewer
    /// than two tabs.
    pub fn previous_index(&self) -> Option<usize> {
        let count = self.len();
        match self.selected {
            Some(i) if count > 1 => Some((i + count - 1) % count),
            _ => None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Add a document and select it.
    ///
    /// With `replace_empty`, a selected document that is new, clean and
    /// empty is overwritten in place instead of appending a new tab.
    pub fn add(&mut self, document: Document, replace_empty: bool) -> Added {
        if replace_empty && self.can_replace_current() {
            if let Some(index) = self.selected {
                let replaced = std::mem::replace(&mut self.documents[index], document);
                debug!("Replaced empty tab at index {}", index);
                return Added {
                    index,
                    replaced: Some(replaced),
                };
            }
        }

        self.documents.push(document);
        let index = self.documents.len() - 1;
        self.selected = Some(index);
        debug!("Added tab at index {}", index);
        Added {
            index,
            replaced: None,
        }
    }

    /// Select the document at `index`.
    ///
    /// Returns `false` for an out-of-range index.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.documents.len() {
            self.selected = Some(index);
            true
        } else {
            false
        }
    }

    /// Remove the document at `index`.
    ///
    /// Afterwards the selection is `min(index, len - 1)`, or `None` when the
    /// collection became empty.
    pub fn remove(&mut self, index: usize) -> Option<Document> {
        if index >= self.documents.len() {
            return None;
        }
        let removed = self.documents.remove(index);
        self.selected = if self.documents.is_empty() {
            None
        } else {
            Some(index.min(self.documents.len() - 1))
        };
        debug!("Removed tab {}, selection is now {:?}", index, self.selected);
        Some(removed)
    }

    /// Remove every document except the one at `keep`, which becomes the
    /// only (and selected) tab.
    pub fn remove_all_except(&mut self, keep: usize) -> Vec<Document> {
        if keep >= self.documents.len() {
            return Vec::new();
        }
        let kept = self.documents.remove(keep);
        let removed = std::mem::replace(&mut self.documents, vec![kept]);
        self.selected = Some(0);
        removed
    }

    /// Remove every document.
    pub fn clear(&mut self) -> Vec<Document> {
        self.selected = None;
        std::mem::take(&mut self.documents)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn doc(path: &str) -> Document {
        Document::with_content(PathBuf::from(path), format!("content of {}", path))
    }

    fn paths(tabs: &TabCollection) -> Vec<String> {
        tabs.documents().iter().map(|d| d.display_path()).collect()
    }

    #[test]
    fn test_empty_collection_has_no_selection() {
        let tabs = TabCollection::new();
        assert!(tabs.is_empty());
        assert_eq!(tabs.selected_index(), None);
        assert!(tabs.current().is_none());
        assert!(!tabs.can_replace_current());
    }

    #[test]
    fn test_add_appends_and_selects() {
        let mut tabs = TabCollection::new();
        assert_eq!(tabs.add(doc("/a.md"), true).index, 0);
        let added = tabs.add(doc("/b.md"), true);
        assert_eq!(added.index, 1);
        assert!(added.replaced.is_none());
        assert_eq!(tabs.selected_index(), Some(1));
        assert_eq!(paths(&tabs), vec!["/a.md", "/b.md"]);
    }

    #[test]
    fn test_add_replaces_untouched_empty_tab() {
        let mut tabs = TabCollection::new();
        tabs.add(Document::create_new(), true);

        let added = tabs.add(doc("/tmp/b.md"), true);
        assert_eq!(added.index, 0);
        assert!(added.replaced.is_some());
        assert_eq!(tabs.len(), 1);
        assert!(tabs.current().unwrap().has_path(Path::new("/tmp/b.md")));
    }

    #[test]
    fn test_add_keeps_position_of_replaced_tab() {
        let mut tabs = TabCollection::new();
        tabs.add(doc("/a.md"), true);
        tabs.add(Document::create_new(), false);
        tabs.add(doc("/c.md"), false);
        tabs.select(1);

        let added = tabs.add(doc("/b.md"), true);
        assert_eq!(added.index, 1);
        assert_eq!(paths(&tabs), vec!["/a.md", "/b.md", "/c.md"]);
    }

    #[test]
    fn test_add_does_not_replace_edited_or_disabled() {
        let mut tabs = TabCollection::new();
        tabs.add(Document::create_new(), true);
        tabs.add(doc("/a.md"), false);
        assert_eq!(tabs.len(), 2);

        let mut tabs = TabCollection::new();
        let mut edited = Document::create_new();
        edited.set_content("x");
        tabs.add(edited, true);
        tabs.add(doc("/a.md"), true);
        assert_eq!(tabs.len(), 2);
    }

    #[test]
    fn test_find_by_path_is_case_insensitive() {
        let mut tabs = TabCollection::new();
        tabs.add(doc("/Docs/A.md"), true);
        tabs.add(doc("/docs/b.md"), true);
        assert_eq!(tabs.find_by_path(Path::new("/docs/a.MD")), Some(0));
        assert_eq!(tabs.find_by_path(Path::new("/docs/c.md")), None);
    }

    #[test]
    fn test_remove_selects_neighbour() {
        let mut tabs = TabCollection::new();
        for p in ["/a.md", "/b.md", "/c.md"] {
            tabs.add(doc(p), true);
        }

        tabs.remove(1);
        assert_eq!(tabs.selected_index(), Some(1));
        assert_eq!(paths(&tabs), vec!["/a.md", "/c.md"]);

        tabs.remove(1);
        assert_eq!(tabs.selected_index(), Some(0));

        tabs.remove(0);
        assert_eq!(tabs.selected_index(), None);
        assert!(tabs.remove(0).is_none());
    }

    #[test]
    fn test_remove_all_except() {
        let mut tabs = TabCollection::new();
        for p in ["/a.md", "/b.md", "/c.md"] {
            tabs.add(doc(p), true);
        }
        let removed = tabs.remove_all_except(1);
        assert_eq!(removed.len(), 2);
        assert_eq!(paths(&tabs), vec!["/b.md"]);
        assert_eq!(tabs.selected_index(), Some(0));
    }

    #[test]
    fn test_clear() {
        let mut tabs = TabCollection::new();
        tabs.add(doc("/a.md"), true);
        tabs.add(doc("/b.md"), true);
        assert_eq!(tabs.clear().len(), 2);
        assert!(tabs.is_empty());
        assert_eq!(tabs.selected_index(), None);
    }

    #[test]
    fn test_next_and_previous_wrap() {
        let mut tabs = TabCollection::new();
        tabs.add(doc("/a.md"), true);
        assert_eq!(tabs.next_index(), None);
        assert_eq!(tabs.previous_index(), None);

        tabs.add(doc("/b.md"), true);
        tabs.add(doc("/c.md"), true);
        assert_eq!(tabs.next_index(), Some(0));
        assert_eq!(tabs.previous_index(), Some(1));
        tabs.select(0);
        assert_eq!(tabs.previous_index(), Some(2));
    }

    #[test]
    fn test_select_out_of_range() {
        let mut tabs = TabCollection::new();
        tabs.add(doc("/a.md"), true);
        assert!(!tabs.select(3));
        assert_eq!(tabs.selected_index(), Some(0));
    }
}
