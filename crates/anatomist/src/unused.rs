//! # Unused File Detection
//!
//! A file is considered referenced when some *other* file either
//! - imports a name with a dotted segment occurring in the file's root-relative
//!   module path (`import pkg.x` references `pkg/utils.py`), or
//! - mentions the file's stem anywhere in its raw text.
//!
//! Both tests are plain substring checks. They over-approximate references on
//! purpose and are not resolved against real module paths.
//!
//! The referrer relation is kept as a `petgraph` graph (referrer → candidate,
//! one witness edge per referenced candidate). Candidates left with no incoming
//! edge are reported, unless their name is a configured entry point.

use std::collections::{BTreeMap, HashMap};

use common::{AnalysisConfig, UnusedFileRecord};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::graph::ReferenceGraph;
use crate::pipeline::FileAnalysis;

/// Why a referrer counts as referencing a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evidence {
    /// Import of a name whose dotted segment occurs in the candidate's module path.
    Import(String),
    /// The candidate's stem occurs in the referrer's text.
    Mention,
}

/// Output of [`detect`].
#[derive(Debug, Default)]
pub struct UnusedScan {
    /// One record per unreferenced, non-entry-point file, in file order.
    pub records: Vec<UnusedFileRecord>,
    /// Node weights are file keys; edges run referrer → candidate.
    pub referrers: DiGraph<String, Evidence>,
}

impl UnusedScan {
    /// `(candidate, referrer, evidence)` for every referenced file, in file order.
    pub fn witnesses(&self) -> impl Iterator<Item = (&str, &str, &Evidence)> {
        self.referrers.edge_references().map(|edge| {
            (
                self.referrers[edge.target()].as_str(),
                self.referrers[edge.source()].as_str(),
                edge.weight(),
            )
        })
    }
}

/// Flags files with no detected referrer.
///
/// Files without a snapshot (`stat` missing) cannot be described and are
/// skipped with a warning.
pub fn detect(files: &[FileAnalysis], graph: &ReferenceGraph, config: &AnalysisConfig) -> UnusedScan {
    let mut referrers: DiGraph<String, Evidence> = DiGraph::with_capacity(files.len(), files.len());
    let nodes: Vec<NodeIndex> = files
        .iter()
        .map(|f| referrers.add_node(f.file.clone()))
        .collect();
    let by_key: HashMap<&str, NodeIndex> = files
        .iter()
        .zip(&nodes)
        .map(|(f, &n)| (f.file.as_str(), n))
        .collect();

    // stem id → files whose text mentions it, in file order
    let mut mentioned_by: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, file) in files.iter().enumerate() {
        for &stem in &file.mentions {
            mentioned_by.entry(stem).or_default().push(i);
        }
    }

    let mut exempt = 0usize;
    for (i, candidate) in files.iter().enumerate() {
        if config.is_entry_point(&candidate.file_name) {
            exempt += 1;
            continue;
        }

        let by_import = graph
            .overlapping_referrer(&candidate.module_path, &candidate.file)
            .and_then(|(referrer, segment)| {
                by_key
                    .get(referrer)
                    .map(|&node| (node, Evidence::Import(segment.to_string())))
            });
        let witness = by_import.or_else(|| {
            let stem = candidate.stem?;
            mentioned_by
                .get(&stem)?
                .iter()
                .find(|&&j| j != i)
                .map(|&j| (nodes[j], Evidence::Mention))
        });

        if let Some((referrer, evidence)) = witness {
            referrers.add_edge(referrer, nodes[i], evidence);
        }
    }

    let mut records = Vec::new();
    for (candidate, &node) in files.iter().zip(&nodes) {
        if config.is_entry_point(&candidate.file_name) {
            continue;
        }
        let referenced = referrers
            .neighbors_directed(node, Direction::Incoming)
            .next()
            .is_some();
        if referenced {
            continue;
        }
        match candidate.stat {
            Some((size, modified)) => {
                records.push(UnusedFileRecord::new(&candidate.file, size, modified))
            }
            None => tracing::warn!(file = %candidate.file, "no metadata for unreferenced file; not reported"),
        }
    }

    tracing::debug!(
        files = files.len(),
        exempt,
        referenced = referrers.edge_count(),
        unused = records.len(),
        "unused-file detection complete"
    );
    UnusedScan { records, referrers }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ReferenceGraphBuilder;
    use crate::scan::MentionScanner;
    use common::UNUSED_REASON;
    use std::path::Path;

    /// Builds analyses the way the pipeline does, from `(relative path, text)` pairs.
    fn analyze(files: &[(&str, &str)]) -> (Vec<FileAnalysis>, ReferenceGraph) {
        let root = Path::new("/proj");
        let paths: Vec<_> = files.iter().map(|(p, _)| root.join(p)).collect();
        let scanner =
            MentionScanner::new(paths.iter().map(|p| crate::path_util::file_stem(p))).unwrap();
        let mut host = crate::ParserHost::new().unwrap();
        let mut builder = ReferenceGraphBuilder::new();

        let analyses = paths
            .iter()
            .zip(files)
            .map(|(path, (_, text))| {
                let mut a = FileAnalysis::new(root, path);
                a.stem = scanner.stem_id(&crate::path_util::file_stem(path));
                a.stat = Some((text.len() as u64, 1_700_000_000));
                a.mentions = scanner.mentions(text);
                if let Ok(extraction) = host.extract(text, &a.file) {
                    builder.add(&a.file, extraction.references);
                }
                a
            })
            .collect();
        (analyses, builder.build())
    }

    fn unused_files(scan: &UnusedScan) -> Vec<&str> {
        scan.records.iter().map(|r| r.file.as_str()).collect()
    }

    #[test]
    fn test_unreferenced_file_reported() {
        let (files, graph) = analyze(&[
            ("main.py", "print('hi')\n"),
            ("orphan.py", "def lonely():\n    pass\n"),
        ]);
        let scan = detect(&files, &graph, &AnalysisConfig::default());

        assert_eq!(unused_files(&scan), vec!["/proj/orphan.py"]);
        let record = &scan.records[0];
        assert_eq!(record.reason, UNUSED_REASON);
        assert_eq!(record.size, 23);
        assert_eq!(record.modified, 1_700_000_000);
    }

    #[test]
    fn test_entry_point_exempt() {
        let (files, graph) = analyze(&[("main.py", "x = 1\n"), ("pkg/__init__.py", "")]);
        let scan = detect(&files, &graph, &AnalysisConfig::default());
        assert!(scan.records.is_empty());
    }

    #[test]
    fn test_import_overlap_references() {
        let (files, graph) = analyze(&[
            ("main.py", "from pkg.tools import run\n"),
            ("pkg/helpers.py", "VALUE = 1\n"),
        ]);
        let scan = detect(&files, &graph, &AnalysisConfig::default());

        // `pkg` occurs in `pkg/helpers`, so the import counts.
        assert!(scan.records.is_empty());
        assert_eq!(
            scan.witnesses().collect::<Vec<_>>(),
            vec![(
                "/proj/pkg/helpers.py",
                "/proj/main.py",
                &Evidence::Import("pkg".into())
            )]
        );
    }

    #[test]
    fn test_stem_mention_references() {
        let (files, graph) = analyze(&[
            ("main.py", "run('worker')\n"),
            ("worker.py", "def go():\n    pass\n"),
        ]);
        let scan = detect(&files, &graph, &AnalysisConfig::default());

        assert!(scan.records.is_empty());
        assert_eq!(
            scan.witnesses().collect::<Vec<_>>(),
            vec![("/proj/worker.py", "/proj/main.py", &Evidence::Mention)]
        );
    }

    #[test]
    fn test_self_mention_does_not_count() {
        let (files, graph) = analyze(&[
            ("main.py", "x = 1\n"),
            ("solo.py", "import solo\nsolo_value = 1\n"),
        ]);
        let scan = detect(&files, &graph, &AnalysisConfig::default());
        assert_eq!(unused_files(&scan), vec!["/proj/solo.py"]);
    }

    #[test]
    fn test_missing_metadata_not_reported() {
        let (mut files, graph) = analyze(&[("main.py", ""), ("gone.py", "")]);
        files[1].stat = None;
        let scan = detect(&files, &graph, &AnalysisConfig::default());
        assert!(scan.records.is_empty());
    }

    #[test]
    fn test_custom_entry_points() {
        let (files, graph) = analyze(&[("cli.py", "x = 1\n"), ("main.py", "y = 2\n")]);
        let mut config = AnalysisConfig::default();
        config.entry_points.clear();
        config.entry_points.insert("cli.py".into());

        let scan = detect(&files, &graph, &config);
        assert_eq!(unused_files(&scan), vec!["/proj/main.py"]);
    }
}
