//! Path normalization utilities for cross-platform file handling.

use std::path::Path;

/// Normalizes a path for use as a report key and map key.
///
/// Converts to a UTF-8 string with forward slashes, stripping the UNC prefix on
/// Windows. Does not touch the filesystem.
///
/// # Example
/// ```
/// use std::path::Path;
/// use anatomist::path_util::normalize_path;
///
/// assert_eq!(normalize_path(Path::new("/project/src/api.py")), "/project/src/api.py");
/// ```
pub fn normalize_path(path: &Path) -> String {
    dunce::simplified(path).to_string_lossy().replace('\\', "/")
}

/// Root-relative module path with the extension stripped: `pkg/utils.py` → `pkg/utils`.
///
/// Falls back to the full normalized path when `path` is not below `root`.
///
/// # Example
/// ```
/// use std::path::Path;
/// use anatomist::path_util::module_path;
///
/// let root = Path::new("/project");
/// assert_eq!(module_path(root, Path::new("/project/pkg/utils.py")), "pkg/utils");
/// ```
pub fn module_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    normalize_path(&relative.with_extension(""))
}

/// Bare file name (`utils.py`), empty when the path has none.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// File name without its final extension (`utils.py` → `utils`).
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
