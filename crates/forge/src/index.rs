//! Digest multimap and duplicate grouping.
//!
//! [`DigestIndex`] is a write-once accumulator: per-file unit lists are merged
//! into it after extraction, and [`DigestIndex::into_groups`] turns every
//! digest with two or more occurrences into a [`DuplicateGroup`].
//!
//! Output order never depends on insertion order. Groups are keyed by
//! `(kind, digest)` in a `BTreeMap`, members are sorted by `(file, line)`,
//! and the emitted groups are sorted by kind then first location.

use crate::{CodeUnit, ContentDigest, UnitKind};
use serde::Serialize;
use std::collections::BTreeMap;

/// One occurrence of a duplicated unit: `start_line..=end_line` in `file`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Location {
    pub file: String,
    pub start_line: u32,
    pub end_line: u32,
}

impl Location {
    /// Inclusive line span (`end - start + 1`).
    pub fn line_span(&self) -> usize {
        (self.end_line.saturating_sub(self.start_line) as usize) + 1
    }
}

/// All occurrences of one content digest (at least two by construction).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateGroup {
    /// The shared content digest.
    pub digest: ContentDigest,
    pub kind: UnitKind,
    /// Ordered by `(file, start_line)`.
    pub locations: Vec<Location>,
    /// Source text of the first location.
    pub code: String,
    /// Always `1.0`: only exact matches are grouped.
    pub similarity: f64,
}

impl DuplicateGroup {
    /// Returns the number of duplicate occurrences in this group.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Returns `true` if this group has no members (never happens for emitted groups).
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Sum of `end - start + 1` over every location, including the first copy.
    pub fn duplicate_lines(&self) -> usize {
        self.locations.iter().map(Location::line_span).sum()
    }
}

/// Accumulator mapping `(kind, digest)` to every unit carrying that digest.
#[derive(Debug, Default)]
pub struct DigestIndex {
    buckets: BTreeMap<(UnitKind, ContentDigest), Vec<CodeUnit>>,
    units: usize,
}

impl DigestIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, unit: CodeUnit) {
        self.units += 1;
        self.buckets
            .entry((unit.kind(), unit.digest()))
            .or_default()
            .push(unit);
    }

    /// Folds one file's units into the index.
    pub fn extend(&mut self, units: impl IntoIterator<Item = CodeUnit>) {
        for unit in units {
            self.insert(unit);
        }
    }

    /// Total number of units inserted.
    pub fn unit_count(&self) -> usize {
        self.units
    }

    /// Number of distinct `(kind, digest)` keys.
    pub fn distinct_count(&self) -> usize {
        self.buckets.len()
    }

    /// Emits one group per digest with at least two distinct `(file, line)` occurrences.
    pub fn into_groups(self) -> Vec<DuplicateGroup> {
        let mut groups: Vec<DuplicateGroup> = self
            .buckets
            .into_iter()
            .filter(|(_, units)| units.len() >= 2)
            .filter_map(|((kind, digest), mut units)| {
                units.sort_by(|a, b| {
                    (a.file(), a.start_line()).cmp(&(b.file(), b.start_line()))
                });
                // The same occurrence inserted twice never groups with itself.
                units.dedup_by(|a, b| a.file() == b.file() && a.start_line() == b.start_line());
                if units.len() < 2 {
                    return None;
                }

                let locations = units
                    .iter()
                    .map(|u| Location {
                        file: u.file().to_string(),
                        start_line: u.start_line(),
                        end_line: u.end_line(),
                    })
                    .collect();
                let code = units[0].text().to_string();

                Some(DuplicateGroup {
                    digest,
                    kind,
                    locations,
                    code,
                    similarity: 1.0,
                })
            })
            .collect();

        groups.sort_by(|a, b| {
            a.kind
                .cmp(&b.kind)
                .then_with(|| a.locations[0].cmp(&b.locations[0]))
                .then_with(|| a.digest.cmp(&b.digest))
        });

        tracing::debug!(groups = groups.len(), "duplicate groups emitted");
        groups
    }
}
