//! Stem mention scan: one Aho-Corasick automaton over every discovered file stem.
//!
//! Each file's text is scanned once during extraction, so the unused-file pass
//! never re-reads anything. Overlapping matches are reported, which makes the
//! result a plain substring test per stem (`util` is mentioned by `utils.helper`).
//!
//! **Time complexity**: O(sum of stem lengths) to build, O(text + matches) per file.

use aho_corasick::{AhoCorasick, MatchKind};
use std::collections::BTreeSet;

use crate::AnatomistError;

/// Finds which file stems occur in a text.
pub struct MentionScanner {
    automaton: AhoCorasick,
    stems: Vec<String>,
}

impl MentionScanner {
    /// Builds the automaton from the given stems. Duplicates and empty stems are dropped.
    ///
    /// # Errors
    /// `Pattern` if the automaton cannot be constructed.
    pub fn new<I, S>(stems: I) -> Result<Self, AnatomistError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stems: Vec<String> = stems
            .into_iter()
            .map(Into::into)
            .filter(|s| !s.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(&stems)
            .map_err(|e| AnatomistError::Pattern(format!("stem automaton: {e}")))?;

        Ok(Self { automaton, stems })
    }

    /// Pattern id of `stem`, if it was registered.
    pub fn stem_id(&self, stem: &str) -> Option<usize> {
        self.stems.binary_search_by(|s| s.as_str().cmp(stem)).ok()
    }

    pub fn stem(&self, id: usize) -> Option<&str> {
        self.stems.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.stems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stems.is_empty()
    }

    /// Ids of every stem occurring anywhere in `text`.
    pub fn mentions(&self, text: &str) -> BTreeSet<usize> {
        if self.stems.is_empty() {
            return BTreeSet::new();
        }
        self.automaton
            .find_overlapping_iter(text)
            .map(|m| m.pattern().as_usize())
            .collect()
    }
}
