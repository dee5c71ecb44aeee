//! # The Anatomist: Source Tree Analysis
//!
//! **Role**: Walks a Python source tree and produces an [`AnalysisReport`]:
//! exact-duplicate functions/classes, files nobody seems to reference, and
//! per-line style issues.
//!
//! **Stages** (see [`pipeline::run`]):
//! 1. [`discovery`]: sorted, lazily walked `.py` files under the root.
//! 2. [`parser`] + [`imports`]: one tree-sitter parse per file; code units and
//!    import names collected by a single tagged-variant visitor.
//! 3. [`forge::DigestIndex`]: duplicate grouping by content digest.
//! 4. [`graph`]: file → referenced-name mapping.
//! 5. [`unused`]: import-overlap and stem-mention heuristic (fed by [`scan`]).
//! 6. [`issues`]: raw-text line rules.
//! 7. [`AnalysisReport::assemble`]: totals and savings.
//!
//! **Failure model**: only a missing root is fatal. Parse and read failures are
//! logged per file and the run continues.

pub mod discovery;
pub mod graph;
pub mod imports;
pub mod issues;
pub mod parser;
pub mod path_util;
pub mod pipeline;
pub mod scan;
pub mod source;
pub mod unused;

pub use common::{AnalysisConfig, AnalysisReport};
pub use issues::{IssueScanner, LineRule};
pub use parser::{Extraction, ParserHost, SyntaxNode};
pub use pipeline::{run, Analyzer, FileAnalysis};

use std::path::PathBuf;

/// Errors produced by the Anatomist crate.
#[derive(Debug, thiserror::Error)]
pub enum AnatomistError {
    /// The scan root does not exist or is not a directory. Fatal.
    #[error("Root not found: {0}")]
    RootNotFound(PathBuf),

    /// A file could not be parsed; it is skipped for unit/reference extraction.
    #[error("Parse failure in {path}: {reason}")]
    ParseFailure { path: String, reason: String },

    /// A file could not be read (or is not valid UTF-8).
    #[error("Read failure in {path}: {reason}")]
    ReadFailure { path: String, reason: String },

    /// Keyword automaton construction failed.
    #[error("Pattern build failed: {0}")]
    Pattern(String),

    /// The worker pool could not be created.
    #[error("Thread pool: {0}")]
    ThreadPool(String),

    /// I/O error (root resolution).
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_failure_display() {
        let err = AnatomistError::ParseFailure {
            path: "a.py".into(),
            reason: "syntax error at line 1, column 5".into(),
        };
        assert!(err.to_string().contains("a.py"));
    }

    #[test]
    fn test_error_display() {
        let err = AnatomistError::RootNotFound(PathBuf::from("/nope"));
        assert_eq!(err.to_string(), "Root not found: /nope");
    }
}
