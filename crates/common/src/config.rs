//! Analysis configuration.
//!
//! Every threshold and exclusion set has a default; a `tidy.toml` at the scan
//! root (or an explicit file) overrides individual fields:
//!
//! ```toml
//! exclude_dirs = [".git", "build"]
//! max_line_length = 100
//! todo_keywords = ["TODO", "HACK"]
//! ```

use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// File name looked up at the scan root by [`AnalysisConfig::from_default_locations`].
pub const DEFAULT_CONFIG_FILE: &str = "tidy.toml";

/// Errors from loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Directory names skipped anywhere below the root.
    pub exclude_dirs: BTreeSet<String>,
    /// Bare file names skipped during discovery.
    pub exclude_files: BTreeSet<String>,
    /// Bare file names never reported as unused.
    pub entry_points: BTreeSet<String>,
    /// Lines strictly longer than this (in characters) are reported.
    pub max_line_length: usize,
    /// Marker substrings reported as `todo` (matched case-insensitively).
    pub todo_keywords: Vec<String>,
    /// Decorator substrings checked by the adjacent-decorator lookback.
    pub decorator_keywords: Vec<String>,
    /// Soft ceiling on discovered files.
    pub max_files: Option<usize>,
    /// Soft ceiling on scanned lines.
    pub max_lines: Option<usize>,
    /// Worker threads for per-file extraction; `None` uses the rayon default.
    pub jobs: Option<usize>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            exclude_dirs: set(&[
                ".git",
                "__pycache__",
                ".pytest_cache",
                "venv",
                ".venv",
                ".env",
                "node_modules",
            ]),
            exclude_files: BTreeSet::new(),
            entry_points: set(&["main.py", "settings.py", "config.py", "__init__.py"]),
            max_line_length: 120,
            todo_keywords: vec!["TODO".into(), "FIXME".into(), "XXX".into()],
            decorator_keywords: vec!["cached".into(), "retry".into(), "method_cache".into()],
            max_files: None,
            max_lines: None,
            jobs: None,
        }
    }
}

impl AnalysisConfig {
    /// Loads a TOML configuration file. Missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `<root>/tidy.toml` when present, otherwise returns the defaults.
    pub fn from_default_locations(root: &Path) -> Result<Self, ConfigError> {
        let candidate = root.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "loading config");
            Self::from_file(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    pub fn is_entry_point(&self, file_name: &str) -> bool {
        self.entry_points.contains(file_name)
    }
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}
