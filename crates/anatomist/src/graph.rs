//! # Reference Graph
//!
//! File → referenced module names, as collected from import statements. Names
//! are kept raw (`pkg.utils`, `os.path`); nothing is resolved to a file here.
//! The unused-file pass queries the graph by dotted segment, so the builder
//! also keeps a segment → referrers index.

use std::collections::{BTreeMap, BTreeSet};

/// Accumulates per-file references during the sequential reduce.
#[derive(Debug, Default)]
pub struct ReferenceGraphBuilder {
    references: BTreeMap<String, BTreeSet<String>>,
}

impl ReferenceGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the names imported by `file`. A file with no imports is still registered.
    pub fn add(&mut self, file: &str, names: impl IntoIterator<Item = String>) {
        self.references
            .entry(file.to_string())
            .or_default()
            .extend(names);
    }

    pub fn build(self) -> ReferenceGraph {
        let mut segments: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (file, names) in &self.references {
            for segment in names.iter().flat_map(|n| n.split('.')) {
                if segment.is_empty() {
                    continue;
                }
                segments
                    .entry(segment.to_string())
                    .or_default()
                    .insert(file.clone());
            }
        }
        tracing::debug!(
            files = self.references.len(),
            segments = segments.len(),
            "reference graph built"
        );
        ReferenceGraph {
            references: self.references,
            segments,
        }
    }
}

/// Immutable file → reference-name mapping.
#[derive(Debug, Default)]
pub struct ReferenceGraph {
    references: BTreeMap<String, BTreeSet<String>>,
    segments: BTreeMap<String, BTreeSet<String>>,
}

impl ReferenceGraph {
    /// Files registered with the builder, including those with no imports.
    pub fn file_count(&self) -> usize {
        self.references.len()
    }

    /// Finds a file other than `exclude` whose references contain a dotted
    /// segment occurring in `module_path`.
    ///
    /// Returns the first such `(referrer, segment)` in lexical order.
    pub fn overlapping_referrer<'g>(
        &'g self,
        module_path: &str,
        exclude: &str,
    ) -> Option<(&'g str, &'g str)> {
        self.segments
            .iter()
            .filter(|(segment, _)| module_path.contains(segment.as_str()))
            .find_map(|(segment, files)| {
                files
                    .iter()
                    .find(|f| f.as_str() != exclude)
                    .map(|f| (f.as_str(), segment.as_str()))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(entries: &[(&str, &[&str])]) -> ReferenceGraph {
        let mut builder = ReferenceGraphBuilder::new();
        for (file, names) in entries {
            builder.add(file, names.iter().map(|n| n.to_string()));
        }
        builder.build()
    }

    #[test]
    fn test_files_without_imports_registered() {
        let g = graph(&[("a.py", &["os", "pkg.utils"]), ("b.py", &[])]);

        assert_eq!(g.file_count(), 2);
        assert_eq!(g.overlapping_referrer("pkg/utils", "x.py"), Some(("a.py", "pkg")));
        assert_eq!(g.overlapping_referrer("b", "x.py"), None);
    }

    #[test]
    fn test_overlap_by_segment() {
        let g = graph(&[("main.py", &["pkg.utils"])]);

        assert_eq!(
            g.overlapping_referrer("pkg/utils", "pkg/utils.py"),
            Some(("main.py", "pkg"))
        );
        assert_eq!(
            g.overlapping_referrer("lib/utils_extra", "lib/utils_extra.py"),
            Some(("main.py", "utils"))
        );
        assert_eq!(g.overlapping_referrer("other", "other.py"), None);
    }

    #[test]
    fn test_self_reference_excluded() {
        let g = graph(&[("utils.py", &["utils"])]);
        assert_eq!(g.overlapping_referrer("utils", "utils.py"), None);
    }

    #[test]
    fn test_add_merges_names() {
        let mut builder = ReferenceGraphBuilder::new();
        builder.add("a.py", vec!["x".to_string()]);
        builder.add("a.py", vec!["y".to_string()]);
        let g = builder.build();

        assert_eq!(g.file_count(), 1);
        assert_eq!(g.overlapping_referrer("lib/x", "lib/x.py"), Some(("a.py", "x")));
        assert_eq!(g.overlapping_referrer("lib/y", "lib/y.py"), Some(("a.py", "y")));
    }
}
