//! Shared model for the analysis pipeline: configuration, per-line issues,
//! unused-file records, and the aggregate [`AnalysisReport`].

pub mod config;
pub mod report;

pub use config::{AnalysisConfig, ConfigError};
pub use report::{AnalysisReport, PotentialSavings};

use serde::Serialize;
use std::fmt;

/// Reason attached to every unused-file record.
pub const UNUSED_REASON: &str = "not imported or referenced";

/// Severity of a [`CodeIssue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The per-line checks the issue scanner knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Line longer than the configured limit.
    LongLine,
    /// Line carrying a TODO/FIXME/XXX style marker.
    Todo,
    /// Two adjacent cache/retry style decorators.
    DuplicateDecorator,
}

impl IssueKind {
    /// Fixed severity per kind.
    pub fn severity(self) -> Severity {
        match self {
            IssueKind::LongLine => Severity::Low,
            IssueKind::Todo | IssueKind::DuplicateDecorator => Severity::Medium,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IssueKind::LongLine => "long_line",
            IssueKind::Todo => "todo",
            IssueKind::DuplicateDecorator => "duplicate_decorator",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single heuristic finding on one line of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeIssue {
    pub file: String,
    /// 1-indexed.
    pub line: usize,
    pub kind: IssueKind,
    pub description: String,
    pub severity: Severity,
}

impl CodeIssue {
    /// Builds an issue whose severity is derived from `kind`.
    pub fn new(file: impl Into<String>, line: usize, kind: IssueKind, description: String) -> Self {
        Self {
            file: file.into(),
            line,
            kind,
            description,
            severity: kind.severity(),
        }
    }
}

/// A file for which no referrer was detected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnusedFileRecord {
    pub file: String,
    pub reason: String,
    /// Size in bytes at scan time.
    pub size: u64,
    /// Last-modified time, seconds since the Unix epoch.
    pub modified: u64,
}

impl UnusedFileRecord {
    pub fn new(file: impl Into<String>, size: u64, modified: u64) -> Self {
        Self {
            file: file.into(),
            reason: UNUSED_REASON.to_string(),
            size,
            modified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_severity_per_kind() {
        assert_eq!(IssueKind::LongLine.severity(), Severity::Low);
        assert_eq!(IssueKind::Todo.severity(), Severity::Medium);
        assert_eq!(IssueKind::DuplicateDecorator.severity(), Severity::Medium);
    }

    #[test]
    fn test_issue_severity_follows_kind() {
        let issue = CodeIssue::new("a.py", 3, IssueKind::LongLine, "too long".into());
        assert_eq!(issue.severity, Severity::Low);
    }

    #[test]
    fn test_issue_kind_serializes_snake_case() {
        let json = serde_json::to_string(&IssueKind::DuplicateDecorator).unwrap();
        assert_eq!(json, "\"duplicate_decorator\"");
        assert_eq!(serde_json::to_string(&Severity::Medium).unwrap(), "\"medium\"");
    }

    #[test]
    fn test_unused_record_reason() {
        let record = UnusedFileRecord::new("orphan.py", 42, 1_700_000_000);
        assert_eq!(record.reason, "not imported or referenced");
        assert_eq!(record.size, 42);
    }
}
