//! Point-in-time file snapshots.
//!
//! A [`SourceFile`] captures size, modification time and contents once. The
//! contents are memory-mapped and dropped with the snapshot, so per-file text
//! never outlives extraction.

use crate::path_util::normalize_path;
use crate::AnatomistError;
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

enum Contents {
    Empty,
    Mapped(Mmap),
    Unreadable(String),
}

pub struct SourceFile {
    path: PathBuf,
    size: u64,
    modified: u64,
    contents: Contents,
}

impl SourceFile {
    /// Opens `path` and captures its metadata and contents.
    ///
    /// # Errors
    /// `ReadFailure` if the file cannot be opened or stat'ed. A file whose
    /// contents cannot be mapped still yields a snapshot; [`SourceFile::text`]
    /// reports the failure.
    pub fn snapshot(path: &Path) -> Result<Self, AnatomistError> {
        let read_failure = |e: std::io::Error| AnatomistError::ReadFailure {
            path: normalize_path(path),
            reason: e.to_string(),
        };

        let file = File::open(path).map_err(read_failure)?;
        let metadata = file.metadata().map_err(read_failure)?;
        let size = metadata.len();
        let modified = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let contents = if size == 0 {
            Contents::Empty
        } else {
            // SAFETY: The mapping is read-only and the snapshot owns it; the file
            // handle only needs to live until `map` returns.
            match unsafe { Mmap::map(&file) } {
                Ok(m) => Contents::Mapped(m),
                Err(e) => Contents::Unreadable(e.to_string()),
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            size,
            modified,
            contents,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size in bytes at snapshot time.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Modification time in seconds since the Unix epoch (0 when unavailable).
    pub fn modified(&self) -> u64 {
        self.modified
    }

    /// The file contents as UTF-8 text.
    ///
    /// # Errors
    /// `ReadFailure` if the contents could not be mapped or are not valid UTF-8.
    pub fn text(&self) -> Result<&str, AnatomistError> {
        match &self.contents {
            Contents::Empty => Ok(""),
            Contents::Mapped(m) => {
                std::str::from_utf8(m).map_err(|e| AnatomistError::ReadFailure {
                    path: normalize_path(&self.path),
                    reason: format!("not valid UTF-8: {e}"),
                })
            }
            Contents::Unreadable(reason) => Err(AnatomistError::ReadFailure {
                path: normalize_path(&self.path),
                reason: reason.clone(),
            }),
        }
    }
}
