//! End-to-end analysis pipeline.
//!
//! Stages:
//! - **Discovery**: sorted `.py` paths under the root ([`crate::discovery`]).
//! - **Extraction**: per-file read, parse, issue scan and stem mentions, run as a
//!   `rayon` parallel map with one [`ParserHost`] per worker. Results come back
//!   in input order.
//! - **Reduce**: sequential fold into [`DigestIndex`], [`ReferenceGraphBuilder`]
//!   and the issue list.
//! - **Unused files**: barrier step over every file's results ([`crate::unused`]).
//! - **Assemble**: [`AnalysisReport::assemble`].
//!
//! Every accumulator is a local value, so concurrent analyses never share state.

use std::collections::BTreeSet;
use std::mem;
use std::path::{Path, PathBuf};

use common::{AnalysisConfig, AnalysisReport, CodeIssue};
use forge::{CodeUnit, DigestIndex};
use rayon::prelude::*;

use crate::discovery::{discover, resolve_root};
use crate::graph::ReferenceGraphBuilder;
use crate::issues::IssueScanner;
use crate::parser::ParserHost;
use crate::path_util::{file_name, file_stem, module_path, normalize_path};
use crate::scan::MentionScanner;
use crate::source::SourceFile;
use crate::unused;
use crate::AnatomistError;

/// Files handed to the worker pool at a time. The `max_lines` ceiling is checked
/// between batches.
const BATCH_SIZE: usize = 256;

/// Everything the pipeline learned about one file.
///
/// Fields stay at their defaults when the stage that fills them failed: no
/// `stat` or `line_count` after a read failure, no units or references after a
/// parse failure.
#[derive(Debug, Clone, Default)]
pub struct FileAnalysis {
    /// Normalized absolute path; the key used throughout the report.
    pub file: String,
    /// Root-relative path without extension (`pkg/utils`).
    pub module_path: String,
    /// Bare file name (`utils.py`).
    pub file_name: String,
    /// Id of this file's stem in the run's [`MentionScanner`].
    pub stem: Option<usize>,
    /// `(size, modified)` from the snapshot.
    pub stat: Option<(u64, u64)>,
    pub line_count: Option<usize>,
    pub units: Vec<CodeUnit>,
    pub references: BTreeSet<String>,
    pub issues: Vec<CodeIssue>,
    /// Stem ids occurring in this file's text.
    pub mentions: BTreeSet<usize>,
}

impl FileAnalysis {
    pub fn new(root: &Path, path: &Path) -> Self {
        Self {
            file: normalize_path(path),
            module_path: module_path(root, path),
            file_name: file_name(path),
            ..Default::default()
        }
    }
}

/// Reusable analysis engine. Holds the configuration and the compiled issue rules.
///
/// # Example
/// ```no_run
/// use anatomist::{AnalysisConfig, Analyzer};
/// use std::path::Path;
///
/// let analyzer = Analyzer::new(AnalysisConfig::default()).unwrap();
/// let report = analyzer.analyze(Path::new("./my_project")).unwrap();
/// println!("{} duplicate lines", report.duplicate_lines());
/// ```
pub struct Analyzer {
    config: AnalysisConfig,
    issues: IssueScanner,
}

impl Analyzer {
    /// # Errors
    /// `Pattern` if the configured keyword sets cannot be compiled.
    pub fn new(config: AnalysisConfig) -> Result<Self, AnatomistError> {
        let issues = IssueScanner::from_config(&config)?;
        Ok(Self { config, issues })
    }

    /// Analyzes the tree under `root`.
    ///
    /// # Errors
    /// `RootNotFound` before any file is touched if `root` is not a directory;
    /// `Pattern` or `ThreadPool` on infrastructure failure. Per-file read and
    /// parse failures are logged and never returned.
    pub fn analyze(&self, root: &Path) -> Result<AnalysisReport, AnatomistError> {
        let root = resolve_root(root)?;
        let root_key = normalize_path(&root);

        let paths: Vec<PathBuf> = discover(&root, &self.config)?.collect();
        tracing::info!(root = %root_key, files = paths.len(), "discovered source files");

        let mentions = MentionScanner::new(paths.iter().map(|p| file_stem(p)))?;

        let mut analyses = match self.config.jobs {
            Some(jobs) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(jobs)
                    .build()
                    .map_err(|e| AnatomistError::ThreadPool(e.to_string()))?;
                pool.install(|| self.extract_all(&root, &paths, &mentions))
            }
            None => self.extract_all(&root, &paths, &mentions),
        };

        let mut index = DigestIndex::new();
        let mut references = ReferenceGraphBuilder::new();
        let mut issues = Vec::new();
        let mut lines_scanned = 0usize;
        for analysis in &mut analyses {
            index.extend(mem::take(&mut analysis.units));
            references.add(&analysis.file, mem::take(&mut analysis.references));
            issues.append(&mut analysis.issues);
            lines_scanned += analysis.line_count.unwrap_or(0);
        }
        tracing::info!(
            files = analyses.len(),
            lines = lines_scanned,
            units = index.unit_count(),
            distinct = index.distinct_count(),
            issues = issues.len(),
            "extraction complete"
        );

        let duplicates = index.into_groups();
        let graph = references.build();
        tracing::debug!(files = graph.file_count(), "reference graph ready");
        let unused = unused::detect(&analyses, &graph, &self.config);
        for (candidate, referrer, evidence) in unused.witnesses() {
            tracing::debug!(file = candidate, referrer, evidence = ?evidence, "file referenced");
        }
        tracing::info!(
            duplicate_groups = duplicates.len(),
            unused_files = unused.records.len(),
            "analysis complete"
        );

        Ok(AnalysisReport::assemble(
            root_key,
            analyses.len(),
            lines_scanned,
            duplicates,
            unused.records,
            issues,
        ))
    }

    /// Runs per-file extraction batch by batch, stopping once `max_lines` is reached.
    fn extract_all(
        &self,
        root: &Path,
        paths: &[PathBuf],
        mentions: &MentionScanner,
    ) -> Vec<FileAnalysis> {
        let ceiling = self.config.max_lines.unwrap_or(usize::MAX);
        let mut analyses = Vec::with_capacity(paths.len());
        let mut lines = 0usize;

        for batch in paths.chunks(BATCH_SIZE) {
            let results: Vec<FileAnalysis> = batch
                .par_iter()
                .map_init(ParserHost::new, |host, path| {
                    self.analyze_file(host.as_mut().ok(), root, path, mentions)
                })
                .collect();

            for analysis in results {
                if lines >= ceiling {
                    tracing::warn!(
                        max_lines = ceiling,
                        kept = analyses.len(),
                        skipped = paths.len() - analyses.len(),
                        "line ceiling reached; remaining files skipped"
                    );
                    return analyses;
                }
                lines += analysis.line_count.unwrap_or(0);
                analyses.push(analysis);
            }
        }
        analyses
    }

    fn analyze_file(
        &self,
        host: Option<&mut ParserHost>,
        root: &Path,
        path: &Path,
        mentions: &MentionScanner,
    ) -> FileAnalysis {
        let mut analysis = FileAnalysis::new(root, path);
        analysis.stem = mentions.stem_id(&file_stem(path));

        let source = match SourceFile::snapshot(path) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable file");
                return analysis;
            }
        };
        analysis.stat = Some((source.size(), source.modified()));

        let text = match source.text() {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable file");
                return analysis;
            }
        };
        analysis.line_count = Some(text.lines().count());
        analysis.issues = self.issues.scan(&analysis.file, text);
        analysis.mentions = mentions.mentions(text);

        match host {
            Some(host) => match host.extract(text, &analysis.file) {
                Ok(extraction) => {
                    analysis.units = extraction.units;
                    analysis.references = extraction.references;
                }
                Err(e) => tracing::warn!(error = %e, "skipping unit extraction"),
            },
            None => tracing::warn!(file = %analysis.file, "no parser available; skipping unit extraction"),
        }

        tracing::debug!(
            file = %analysis.file,
            units = analysis.units.len(),
            references = analysis.references.len(),
            issues = analysis.issues.len(),
            "file analyzed"
        );
        analysis
    }
}

/// Analyzes the tree under `root` with `config`.
///
/// # Errors
/// See [`Analyzer::analyze`].
pub fn run(root: &Path, config: &AnalysisConfig) -> Result<AnalysisReport, AnatomistError> {
    Analyzer::new(config.clone())?.analyze(root)
}
