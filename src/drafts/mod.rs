//! Recovery drafts for Draftpad
//!
//! A draft is a full snapshot of a document's content written to a
//! dedicated directory, independent of the document's own save path. A
//! draft existing on disk is the only signal that a previous run left
//! recoverable unsaved work behind.
//!
//! # Draft identity
//!
//! Saved documents are keyed by `<file name>_<digest>.draft`, where the
//! digest is the first 16 hex digits of the SHA-256 of the normalized
//! (case-folded, `/`-separated) absolute path. Unsaved documents are keyed
//! by their identity token as `untitled_<run tag>-<id>.md.draft`, where the
//! run tag (start time and process id) keeps a new run from reusing the
//! name of a draft an earlier run left behind.
//!
//! Every operation here is best-effort: failures are logged and never
//! propagate into the caller's save, close or exit path.

use crate::document::{Document, DocumentId};
use crate::error::{Error, Result};
use crate::paths;
use log::{debug, warn};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the drafts directory under the application data directory.
const DRAFTS_DIR_NAME: &str = "drafts";

/// Number of hex digits of the path digest kept in draft file names.
const DIGEST_HEX_LEN: usize = 16;

/// Resolve the default drafts directory.
///
/// - **Windows**: `%LOCALAPPDATA%\draftpad\drafts\`
/// - **macOS**: `~/Library/Application Support/draftpad/drafts/`
/// - **Linux**: `~/.local/share/draftpad/drafts/`
pub fn default_drafts_dir() -> Result<PathBuf> {
    dirs::data_local_dir()
        .map(|base| base.join(crate::APP_DIR_NAME).join(DRAFTS_DIR_NAME))
        .ok_or(Error::ConfigDirNotFound)
}

/// Stable digest of a document path, independent of case and separator style.
pub fn path_digest(path: &Path) -> String {
    let digest = Sha256::digest(paths::identity_key(path).as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(DIGEST_HEX_LEN);
    hex
}

/// Draft file name for a saved document's path.
///
/// The file-name prefix is case-folded like the digest, so paths that only
/// differ in case share one draft.
pub fn draft_file_name_for_path(path: &Path) -> String {
    let key = paths::identity_key(path);
    format!(
        "{}_{}.draft",
        paths::file_name_of(Path::new(&key)),
        path_digest(path)
    )
}

/// Draft file name for an unsaved document.
pub fn draft_file_name_for_untitled(id: DocumentId) -> String {
    format!("untitled_{}.md.draft", id)
}

/// Maps documents to recovery files inside one directory.
#[derive(Debug, Clone)]
pub struct DraftStore {
    dir: PathBuf,
}

impl DraftStore {
    /// Create a store rooted at `dir`. The directory is created lazily.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the platform drafts directory.
    pub fn at_default_location() -> Result<Self> {
        Ok(Self::new(default_drafts_dir()?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Draft location for a document. Pure; touches no files.
    pub fn path_for(&self, document: &Document) -> PathBuf {
        match document.path() {
            Some(path) => self.path_for_file(path),
            None => self.dir.join(draft_file_name_for_untitled(document.id())),
        }
    }

    /// Draft location for a saved document path.
    pub fn path_for_file(&self, path: &Path) -> PathBuf {
        self.dir.join(draft_file_name_for_path(path))
    }

    /// Write the document's current content, overwriting any older draft.
    pub fn write(&self, document: &Document) -> Result<PathBuf> {
        let draft_path = self.path_for(document);
        fs::create_dir_all(&self.dir).map_err(|source| Error::DraftWrite {
            path: self.dir.clone(),
            source,
        })?;
        fs::write(&draft_path, document.content()).map_err(|source| Error::DraftWrite {
            path: draft_path.clone(),
            source,
        })?;
        debug!("Wrote draft {}", draft_path.display());
        Ok(draft_path)
    }

    /// Read the draft for a saved document path.
    ///
    /// Missing or unreadable drafts both yield `None`.
    pub fn read(&self, path: &Path) -> Option<String> {
        let draft_path = self.path_for_file(path);
        match fs::read_to_string(&draft_path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(
                    "Ignoring unreadable draft {}: {}",
                    draft_path.display(),
                    e
                );
                None
            }
        }
    }

    /// Whether a readable draft exists for a saved document path.
    pub fn exists(&self, path: &Path) -> bool {
        self.read(path).is_some()
    }

    /// Delete the document's draft. Idempotent.
    ///
    /// Returns `false` only when a draft existed and could not be removed.
    pub fn delete(&self, document: &Document) -> bool {
        self.delete_at(&self.path_for(document))
    }

    /// Delete the draft stored at an explicit location. Idempotent.
    pub fn delete_at(&self, draft_path: &Path) -> bool {
        match fs::remove_file(draft_path) {
            Ok(()) => {
                debug!("Deleted draft {}", draft_path.display());
                true
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => {
                warn!("Failed to delete draft {}: {}", draft_path.display(), e);
                false
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
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> DraftStore {
        DraftStore::new(dir.path().join("drafts"))
    }

    #[test]
    fn test_path_for_is_deterministic() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let a = Document::with_content(PathBuf::from("/tmp/a.md"), "X".into());
        let b = Document::with_content(PathBuf::from("/tmp/a.md"), "Y".into());

        assert_eq!(store.path_for(&a), store.path_for(&b));
        assert_eq!(store.path_for(&a), store.path_for_file(Path::new("/tmp/a.md")));
    }

    #[test]
    fn test_path_for_ignores_case() {
        assert_eq!(
            draft_file_name_for_path(Path::new("/tmp/Notes.md")),
            draft_file_name_for_path(Path::new("/TMP/notes.md"))
        );
        assert_eq!(
            path_digest(Path::new("/tmp/Notes.md")),
            path_digest(Path::new("/TMP/notes.md"))
        );
    }

    #[test]
    fn test_same_file_name_different_dirs_do_not_collide() {
        assert_ne!(
            draft_file_name_for_path(Path::new("/one/readme.md")),
            draft_file_name_for_path(Path::new("/two/readme.md"))
        );
    }

    #[test]
    fn test_draft_file_name_shape() {
        let name = draft_file_name_for_path(Path::new("/tmp/a.md"));
        assert!(name.starts_with("a.md_"));
        assert!(name.ends_with(".draft"));
        assert_eq!(name.len(), "a.md_".len() + DIGEST_HEX_LEN + ".draft".len());
    }

    #[test]
    fn test_untitled_documents_use_identity_token() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let a = Document::create_new();
        let b = Document::create_new();

        let pa = store.path_for(&a);
        assert_ne!(pa, store.path_for(&b));
        let name = pa.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("untitled_"));
        assert!(name.ends_with(".md.draft"));
    }

    #[test]
    fn test_write_creates_directory_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let mut doc = Document::with_content(PathBuf::from("/tmp/a.md"), "X".into());

        doc.set_content("Y");
        store.write(&doc).unwrap();
        assert_eq!(store.read(Path::new("/tmp/a.md")).as_deref(), Some("Y"));

        doc.set_content("Z");
        store.write(&doc).unwrap();
        assert_eq!(store.read(Path::new("/tmp/a.md")).as_deref(), Some("Z"));
        assert!(store.exists(Path::new("/tmp/A.md")));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let doc = Document::with_content(PathBuf::from("/tmp/a.md"), "X".into());

        assert!(store.delete(&doc));
        store.write(&doc).unwrap();
        assert!(store.exists(Path::new("/tmp/a.md")));
        assert!(store.delete(&doc));
        assert!(!store.exists(Path::new("/tmp/a.md")));
        assert!(store.delete(&doc));
    }

    #[test]
    fn test_read_missing_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(store(&dir).read(Path::new("/tmp/none.md")).is_none());
    }

    #[test]
    fn test_unreadable_draft_is_treated_as_absent() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let draft = store.path_for_file(Path::new("/tmp/bin.md"));
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(&draft, [0xff, 0xfe, 0x00, 0xc3]).unwrap();

        assert!(store.read(Path::new("/tmp/bin.md")).is_none());
        assert!(!store.exists(Path::new("/tmp/bin.md")));
    }

    #[test]
    fn test_write_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let store = DraftStore::new(blocker.join("drafts"));
        let doc = Document::with_content(PathBuf::from("/tmp/a.md"), "X".into());

        let err = store.write(&doc).unwrap_err();
        assert!(matches!(err, Error::DraftWrite { .. }));
    }
}
