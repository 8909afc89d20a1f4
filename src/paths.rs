//! Path identity helpers
//!
//! Document paths are made absolute with [`absolute`] where they enter the
//! session (open, save as, restore) and are then compared case-insensitively
//! everywhere: tab lookup, recent-file de-duplication and draft identity all
//! go through [`identity_key`] so that the three agree.

use log::warn;
use std::path::{Component, Path, PathBuf};

/// Absolute form of `path`, with `.` and `..` folded lexically.
///
/// Relative paths resolve against the current directory. Symlinks are kept
/// as spelled. If the current directory is unavailable the path is only
/// cleaned.
pub fn absolute(path: &Path) -> PathBuf {
    let base = std::path::absolute(path).unwrap_or_else(|e| {
        warn!("Could not make {} absolute: {}", path.display(), e);
        path.to_path_buf()
    });

    let mut cleaned = PathBuf::new();
    for component in base.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if cleaned.file_name().is_some() {
                    cleaned.pop();
                } else if !cleaned.has_root() {
                    cleaned.push("..");
                }
            }
            other => cleaned.push(other.as_os_str()),
        }
    }
    cleaned
}

/// Normalized comparison key for a document path.
///
/// Separators are unified to `/` and the result is lowercased.
pub fn identity_key(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/").to_lowercase()
}

/// Check whether two paths name the same document.
pub fn same_path(a: &Path, b: &Path) -> bool {
    identity_key(a) == identity_key(b)
}

/// The file name component, or the whole path if there is none.
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_same_path_ignores_case() {
        assert!(same_path(
            Path::new("/tmp/Notes/README.md"),
            Path::new("/tmp/notes/readme.md")
        ));
        assert!(!same_path(Path::new("/tmp/a.md"), Path::new("/tmp/b.md")));
    }

    #[test]
    fn test_identity_key_unifies_separators() {
        assert_eq!(
            identity_key(&PathBuf::from("C:\\Docs\\Plan.md")),
            "c:/docs/plan.md"
        );
    }

    #[test]
    fn test_absolute_resolves_relative_paths() {
        let resolved = absolute(Path::new("notes/plan.md"));
        assert!(resolved.is_absolute());
        assert_eq!(
            resolved,
            std::env::current_dir().unwrap().join("notes").join("plan.md")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_absolute_folds_dot_components() {
        assert_eq!(
            absolute(Path::new("/tmp/a/./b/../c.md")),
            PathBuf::from("/tmp/a/c.md")
        );
        assert_eq!(absolute(Path::new("/../a.md")), PathBuf::from("/a.md"));
        assert_eq!(absolute(Path::new("/tmp/a.md")), PathBuf::from("/tmp/a.md"));
    }

    #[test]
    fn test_file_name_of() {
        assert_eq!(file_name_of(Path::new("/tmp/a.md")), "a.md");
        assert_eq!(file_name_of(Path::new("/")), "/");
    }
}
