//! The built-in line rules.

use aho_corasick::AhoCorasick;
use common::IssueKind;

use super::LineRule;
use crate::AnatomistError;

/// Flags lines longer than the limit, counted in characters.
pub struct LongLineRule {
    max_length: usize,
}

impl LongLineRule {
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }
}

impl LineRule for LongLineRule {
    fn check(&self, line: &str, _previous: Option<&str>) -> Option<(IssueKind, String)> {
        let length = line.chars().count();
        (length > self.max_length)
            .then(|| (IssueKind::LongLine, format!("line too long ({length} characters)")))
    }
}

/// Flags lines containing a marker keyword, ignoring case.
pub struct TodoMarkerRule {
    markers: Option<AhoCorasick>,
}

impl TodoMarkerRule {
    /// # Errors
    /// `Pattern` if the marker automaton cannot be built.
    pub fn new(keywords: &[String]) -> Result<Self, AnatomistError> {
        Ok(Self {
            markers: keyword_automaton(keywords.iter().map(|k| k.to_uppercase()))?,
        })
    }
}

impl LineRule for TodoMarkerRule {
    fn check(&self, line: &str, _previous: Option<&str>) -> Option<(IssueKind, String)> {
        let markers = self.markers.as_ref()?;
        markers
            .is_match(&line.trim().to_uppercase())
            .then(|| (IssueKind::Todo, "unfinished TODO/FIXME marker".to_string()))
    }
}

/// Flags a decorator line directly below another decorator line, when both
/// mention one of the keywords.
///
/// Purely textual: any two adjacent `@` lines naming a keyword match, whether
/// or not they decorate the same definition.
pub struct DuplicateDecoratorRule {
    keywords: Option<AhoCorasick>,
}

impl DuplicateDecoratorRule {
    /// # Errors
    /// `Pattern` if the keyword automaton cannot be built.
    pub fn new(keywords: &[String]) -> Result<Self, AnatomistError> {
        Ok(Self {
            keywords: keyword_automaton(keywords.iter().cloned())?,
        })
    }

    fn is_keyword_decorator(&self, keywords: &AhoCorasick, line: &str) -> bool {
        line.contains('@') && keywords.is_match(line)
    }
}

impl LineRule for DuplicateDecoratorRule {
    fn check(&self, line: &str, previous: Option<&str>) -> Option<(IssueKind, String)> {
        let keywords = self.keywords.as_ref()?;
        let previous = previous?;
        (self.is_keyword_decorator(keywords, line) && self.is_keyword_decorator(keywords, previous))
            .then(|| {
                (
                    IssueKind::DuplicateDecorator,
                    "possible duplicate decorator pattern".to_string(),
                )
            })
    }
}

/// `None` when there are no non-empty keywords; such a rule never fires.
fn keyword_automaton(
    keywords: impl Iterator<Item = String>,
) -> Result<Option<AhoCorasick>, AnatomistError> {
    let keywords: Vec<String> = keywords.filter(|k| !k.is_empty()).collect();
    if keywords.is_empty() {
        return Ok(None);
    }
    AhoCorasick::new(&keywords)
        .map(Some)
        .map_err(|e| AnatomistError::Pattern(format!("keyword automaton: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_long_line_boundary() {
        let rule = LongLineRule::new(120);
        assert!(rule.check(&"a".repeat(120), None).is_none());

        let (kind, description) = rule.check(&"a".repeat(121), None).unwrap();
        assert_eq!(kind, IssueKind::LongLine);
        assert_eq!(description, "line too long (121 characters)");
    }

    #[test]
    fn test_long_line_counts_characters_not_bytes() {
        let rule = LongLineRule::new(10);
        assert!(rule.check(&"é".repeat(10), None).is_none());
        assert!(rule.check(&"é".repeat(11), None).is_some());
    }

    #[test]
    fn test_todo_case_insensitive() {
        let rule = TodoMarkerRule::new(&keywords(&["TODO", "FIXME", "XXX"])).unwrap();
        assert!(rule.check("    # todo: handle errors", None).is_some());
        assert!(rule.check("# FixMe", None).is_some());
        assert!(rule.check("return total", None).is_none());
    }

    #[test]
    fn test_todo_is_substring_match() {
        let rule = TodoMarkerRule::new(&keywords(&["TODO"])).unwrap();
        assert!(rule.check("mastodon = load()", None).is_some());
    }

    #[test]
    fn test_todo_lowercase_keywords_configured() {
        let rule = TodoMarkerRule::new(&keywords(&["hack"])).unwrap();
        assert!(rule.check("# HACK around upstream bug", None).is_some());
    }

    #[test]
    fn test_empty_keyword_sets_never_fire() {
        let todo = TodoMarkerRule::new(&[]).unwrap();
        assert!(todo.check("# TODO", None).is_none());

        let deco = DuplicateDecoratorRule::new(&keywords(&[""])).unwrap();
        assert!(deco.check("@cached", Some("@cached")).is_none());
    }

    #[test]
    fn test_duplicate_decorator_lookback() {
        let rule = DuplicateDecoratorRule::new(&keywords(&["cached", "retry"])).unwrap();

        let (kind, _) = rule.check("@retry(3)", Some("@cached")).unwrap();
        assert_eq!(kind, IssueKind::DuplicateDecorator);

        assert!(rule.check("@cached", None).is_none());
        assert!(rule.check("@cached", Some("@property")).is_none());
        assert!(rule.check("def f():", Some("@cached")).is_none());
    }

    #[test]
    fn test_duplicate_decorator_is_textual() {
        let rule = DuplicateDecoratorRule::new(&keywords(&["cached"])).unwrap();
        // Two unrelated lines mentioning '@' and the keyword still match.
        assert!(rule
            .check("email = 'ops@cached.io'", Some("# see @cached docs"))
            .is_some());
    }
}
