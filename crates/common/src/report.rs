//! Report aggregation.
//!
//! [`AnalysisReport::assemble`] is the only constructor. Once built, the
//! report is read-only: fields are private and exposed through accessors, and
//! the whole value serializes with `serde` for the renderers downstream.

use crate::{CodeIssue, UnusedFileRecord};
use forge::DuplicateGroup;
use serde::Serialize;

/// What cleaning up the reported findings could reclaim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PotentialSavings {
    pub duplicate_lines: usize,
    pub unused_files_size: u64,
    pub unused_files_count: usize,
}

/// Aggregate result of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    root: String,
    files_scanned: usize,
    lines_scanned: usize,
    duplicate_lines: usize,
    duplicates: Vec<DuplicateGroup>,
    unused_files: Vec<UnusedFileRecord>,
    issues: Vec<CodeIssue>,
    potential_savings: PotentialSavings,
}

impl AnalysisReport {
    /// Merges the detector outputs and derives the totals.
    ///
    /// `duplicate_lines` counts every occurrence in every group, not only the
    /// extra copies. Unused files and issues are put in `(file, line)` order.
    pub fn assemble(
        root: impl Into<String>,
        files_scanned: usize,
        lines_scanned: usize,
        duplicates: Vec<DuplicateGroup>,
        mut unused_files: Vec<UnusedFileRecord>,
        mut issues: Vec<CodeIssue>,
    ) -> Self {
        let duplicate_lines: usize = duplicates.iter().map(DuplicateGroup::duplicate_lines).sum();

        unused_files.sort_by(|a, b| a.file.cmp(&b.file));
        issues.sort_by(|a, b| (&a.file, a.line, a.kind).cmp(&(&b.file, b.line, b.kind)));

        let potential_savings = PotentialSavings {
            duplicate_lines,
            unused_files_size: unused_files.iter().map(|f| f.size).sum(),
            unused_files_count: unused_files.len(),
        };

        Self {
            root: root.into(),
            files_scanned,
            lines_scanned,
            duplicate_lines,
            duplicates,
            unused_files,
            issues,
            potential_savings,
        }
    }

    /// Normalized scan root.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Files discovered, including those that failed to parse or read.
    pub fn files_scanned(&self) -> usize {
        self.files_scanned
    }

    pub fn lines_scanned(&self) -> usize {
        self.lines_scanned
    }

    pub fn duplicate_lines(&self) -> usize {
        self.duplicate_lines
    }

    pub fn duplicates(&self) -> &[DuplicateGroup] {
        &self.duplicates
    }

    pub fn unused_files(&self) -> &[UnusedFileRecord] {
        &self.unused_files
    }

    pub fn issues(&self) -> &[CodeIssue] {
        &self.issues
    }

    pub fn potential_savings(&self) -> PotentialSavings {
        self.potential_savings
    }
}
