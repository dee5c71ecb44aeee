//! Per-line issue detection over raw file text.
//!
//! This module defines the [`LineRule`] trait and the [`IssueScanner`] that
//! applies a fixed rule set to every line of a file. Rules look at text only,
//! so files that fail to parse are still scanned.

pub mod rules;

use common::{AnalysisConfig, CodeIssue, IssueKind};

use crate::AnatomistError;
pub use rules::{DuplicateDecoratorRule, LongLineRule, TodoMarkerRule};

/// A textual check applied to one line at a time.
///
/// # Implementation Notes
/// - `line` has no terminator
/// - `previous` is the line directly above, `None` on the first line
/// - Rules run for every line of every file; keep them allocation-light
pub trait LineRule: Send + Sync {
    /// Returns the issue kind and description when `line` triggers the rule.
    fn check(&self, line: &str, previous: Option<&str>) -> Option<(IssueKind, String)>;
}

/// Applies the configured rules to file text.
///
/// # Example
/// ```
/// use anatomist::{AnalysisConfig, IssueScanner};
///
/// let scanner = IssueScanner::from_config(&AnalysisConfig::default()).unwrap();
/// let issues = scanner.scan("a.py", "x = 1  # todo: remove\n");
/// assert_eq!(issues.len(), 1);
/// assert_eq!(issues[0].line, 1);
/// ```
pub struct IssueScanner {
    rules: Vec<Box<dyn LineRule>>,
}

impl IssueScanner {
    /// Builds the standard rule set: long lines, TODO markers, adjacent decorators.
    ///
    /// # Errors
    /// `Pattern` if the keyword automata cannot be built.
    pub fn from_config(config: &AnalysisConfig) -> Result<Self, AnatomistError> {
        Ok(Self::with_rules(vec![
            Box::new(LongLineRule::new(config.max_line_length)),
            Box::new(TodoMarkerRule::new(&config.todo_keywords)?),
            Box::new(DuplicateDecoratorRule::new(&config.decorator_keywords)?),
        ]))
    }

    pub fn with_rules(rules: Vec<Box<dyn LineRule>>) -> Self {
        Self { rules }
    }

    /// Scans `text` line by line. Line numbers are 1-based; a line may yield
    /// several issues, in rule order.
    pub fn scan(&self, file: &str, text: &str) -> Vec<CodeIssue> {
        let mut issues = Vec::new();
        let mut previous: Option<&str> = None;
        for (index, line) in text.lines().enumerate() {
            for rule in &self.rules {
                if let Some((kind, description)) = rule.check(line, previous) {
                    issues.push(CodeIssue::new(file, index + 1, kind, description));
                }
            }
            previous = Some(line);
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Severity;

    fn scanner() -> IssueScanner {
        IssueScanner::from_config(&AnalysisConfig::default()).unwrap()
    }

    #[test]
    fn test_clean_file_has_no_issues() {
        assert!(scanner().scan("a.py", "def f():\n    return 1\n").is_empty());
    }

    #[test]
    fn test_line_numbers_and_order() {
        let text = format!("# FIXME later\n{}\n", "a".repeat(130));
        let issues = scanner().scan("a.py", &text);

        assert_eq!(issues.len(), 2);
        assert_eq!((issues[0].line, issues[0].kind), (1, IssueKind::Todo));
        assert_eq!((issues[1].line, issues[1].kind), (2, IssueKind::LongLine));
        assert_eq!(issues[1].severity, Severity::Low);
        assert_eq!(issues[0].file, "a.py");
    }

    #[test]
    fn test_multiple_rules_on_one_line() {
        let text = format!("# TODO {}", "y".repeat(130));
        let kinds: Vec<IssueKind> = scanner().scan("a.py", &text).iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![IssueKind::LongLine, IssueKind::Todo]);
    }

    #[test]
    fn test_custom_rule() {
        struct Tabs;
        impl LineRule for Tabs {
            fn check(&self, line: &str, _previous: Option<&str>) -> Option<(IssueKind, String)> {
                line.contains('\t')
                    .then(|| (IssueKind::LongLine, "tab character".to_string()))
            }
        }

        let scanner = IssueScanner::with_rules(vec![Box::new(Tabs)]);
        let issues = scanner.scan("a.py", "ok\n\tindented\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 2);
        assert_eq!(issues[0].description, "tab character");
    }

    #[test]
    fn test_crlf_lines() {
        let issues = scanner().scan("a.py", "x = 1\r\n# xxx\r\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 2);
    }
}
