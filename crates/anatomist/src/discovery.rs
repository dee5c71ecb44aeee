//! Stage 1: source file discovery.
//!
//! Walks the root with `walkdir`, pruning excluded directory names at any depth
//! below the root, and yields `.py` files in sorted order. The walk is lazy; the
//! only eager work is validating the root.

use crate::AnatomistError;
use common::AnalysisConfig;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Extension of the files the engine analyzes.
pub const SOURCE_EXTENSION: &str = "py";

/// Canonicalizes the scan root.
///
/// # Errors
/// `RootNotFound` if the path does not exist or is not a directory.
pub fn resolve_root(root: &Path) -> Result<PathBuf, AnatomistError> {
    if !root.is_dir() {
        return Err(AnatomistError::RootNotFound(root.to_path_buf()));
    }
    dunce::canonicalize(root).map_err(|_| AnatomistError::RootNotFound(root.to_path_buf()))
}

/// Returns a lazy, deterministic iterator over the source files under `root`.
///
/// Honors `exclude_dirs`, `exclude_files` and the `max_files` soft ceiling.
/// Entries the walker cannot read are logged and skipped.
///
/// # Errors
/// `RootNotFound` if `root` is not an existing directory. Nothing is walked in
/// that case.
pub fn discover(
    root: &Path,
    config: &AnalysisConfig,
) -> Result<impl Iterator<Item = PathBuf>, AnatomistError> {
    if !root.is_dir() {
        return Err(AnatomistError::RootNotFound(root.to_path_buf()));
    }

    let exclude_dirs = config.exclude_dirs.clone();
    let exclude_files = config.exclude_files.clone();
    let limit = config.max_files.unwrap_or(usize::MAX);

    let files = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |e| !is_excluded_dir(e, &exclude_dirs))
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable entry");
                None
            }
        })
        .filter(move |e| is_source_file(e, &exclude_files))
        .map(DirEntry::into_path)
        .take(limit);

    Ok(files)
}

/// Returns `true` if the entry is a directory below the root whose name is excluded.
fn is_excluded_dir(entry: &DirEntry, exclude_dirs: &BTreeSet<String>) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| exclude_dirs.contains(name))
            .unwrap_or(false)
}

fn is_source_file(entry: &DirEntry, exclude_files: &BTreeSet<String>) -> bool {
    let path = entry.path();
    if !path.is_file() {
        return false;
    }
    if path.extension().and_then(|s| s.to_str()) != Some(SOURCE_EXTENSION) {
        return false;
    }
    entry
        .file_name()
        .to_str()
        .map(|name| !exclude_files.contains(name))
        .unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn names(root: &Path, config: &AnalysisConfig) -> Vec<String> {
        discover(root, config)
            .unwrap()
            .map(|p| crate::path_util::module_path(root, &p))
            .collect()
    }

    #[test]
    fn test_nonexistent_root() {
        let result = discover(Path::new("/this/does/not/exist"), &AnalysisConfig::default());
        assert!(matches!(result, Err(AnatomistError::RootNotFound(_))));
    }

    #[test]
    fn test_root_is_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("a.py");
        fs::write(&file, "").unwrap();
        assert!(matches!(
            resolve_root(&file),
            Err(AnatomistError::RootNotFound(_))
        ));
    }

    #[test]
    fn test_sorted_py_only() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("pkg")).unwrap();
        fs::write(tmp.path().join("zeta.py"), "").unwrap();
        fs::write(tmp.path().join("alpha.py"), "").unwrap();
        fs::write(tmp.path().join("notes.txt"), "").unwrap();
        fs::write(tmp.path().join("pkg/mid.py"), "").unwrap();

        let found = names(tmp.path(), &AnalysisConfig::default());
        assert_eq!(found, vec!["alpha", "pkg/mid", "zeta"]);
    }

    #[test]
    fn test_excluded_dirs_pruned_at_any_depth() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("__pycache__")).unwrap();
        fs::create_dir_all(tmp.path().join("pkg/venv/lib")).unwrap();
        fs::write(tmp.path().join("__pycache__/cached.py"), "").unwrap();
        fs::write(tmp.path().join("pkg/venv/lib/site.py"), "").unwrap();
        fs::write(tmp.path().join("pkg/real.py"), "").unwrap();

        let found = names(tmp.path(), &AnalysisConfig::default());
        assert_eq!(found, vec!["pkg/real"]);
    }

    #[test]
    fn test_excluded_files() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("keep.py"), "").unwrap();
        fs::write(tmp.path().join("skip.py"), "").unwrap();

        let mut config = AnalysisConfig::default();
        config.exclude_files.insert("skip.py".into());
        assert_eq!(names(tmp.path(), &config), vec!["keep"]);
    }

    #[test]
    fn test_max_files_ceiling() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["a.py", "b.py", "c.py"] {
            fs::write(tmp.path().join(name), "").unwrap();
        }
        let config = AnalysisConfig {
            max_files: Some(2),
            ..Default::default()
        };
        assert_eq!(names(tmp.path(), &config), vec!["a", "b"]);
    }
}
