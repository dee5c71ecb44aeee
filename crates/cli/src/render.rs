//! Markdown rendering of an [`AnalysisReport`].

use std::collections::BTreeMap;
use std::fmt::Write;

use common::{AnalysisReport, CodeIssue, IssueKind};

/// Characters of representative code shown per duplicate group.
const CODE_PREVIEW: usize = 200;
/// Issues listed per kind before the remainder is summarized.
const ISSUES_PER_KIND: usize = 10;

pub fn markdown(report: &AnalysisReport) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    write_markdown(&mut out, report)?;
    Ok(out)
}

fn write_markdown(out: &mut String, report: &AnalysisReport) -> std::fmt::Result {
    writeln!(out, "# Code Cleanup Report")?;
    writeln!(out)?;
    writeln!(out, "Root: `{}`", report.root())?;
    writeln!(out)?;

    writeln!(out, "## Overview")?;
    writeln!(out)?;
    writeln!(out, "- Files scanned: {}", report.files_scanned())?;
    writeln!(out, "- Lines scanned: {}", report.lines_scanned())?;
    writeln!(out, "- Duplicate lines: {}", report.duplicate_lines())?;
    writeln!(out, "- Unused files: {}", report.unused_files().len())?;
    writeln!(out, "- Issues: {}", report.issues().len())?;
    writeln!(out)?;

    writeln!(out, "## Duplicate Code")?;
    writeln!(out)?;
    writeln!(out, "Found {} duplicate groups.", report.duplicates().len())?;
    writeln!(out)?;
    for (i, group) in report.duplicates().iter().enumerate() {
        writeln!(out, "### Duplicate #{}", i + 1)?;
        writeln!(out)?;
        writeln!(out, "- Kind: {}", group.kind)?;
        writeln!(out, "- Similarity: {:.1}%", group.similarity * 100.0)?;
        writeln!(out, "- Locations:")?;
        for loc in &group.locations {
            writeln!(out, "  - `{}` (lines {}-{})", loc.file, loc.start_line, loc.end_line)?;
        }
        writeln!(out)?;
        writeln!(out, "```python")?;
        writeln!(out, "{}", preview(&group.code))?;
        writeln!(out, "```")?;
        writeln!(out)?;
    }

    writeln!(out, "## Unused Files")?;
    writeln!(out)?;
    writeln!(out, "Found {} possibly unused files.", report.unused_files().len())?;
    writeln!(out)?;
    let mut unused: Vec<_> = report.unused_files().iter().collect();
    unused.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.file.cmp(&b.file)));
    for file in unused {
        writeln!(out, "- `{}` ({} KB) - {}", file.file, kilobytes(file.size), file.reason)?;
    }
    writeln!(out)?;

    writeln!(out, "## Issues")?;
    writeln!(out)?;
    writeln!(out, "Found {} issues.", report.issues().len())?;
    writeln!(out)?;
    let mut by_kind: BTreeMap<IssueKind, Vec<&CodeIssue>> = BTreeMap::new();
    for issue in report.issues() {
        by_kind.entry(issue.kind).or_default().push(issue);
    }
    for (kind, issues) in by_kind {
        writeln!(out, "### {}", title(kind))?;
        writeln!(out)?;
        for issue in issues.iter().take(ISSUES_PER_KIND) {
            writeln!(out, "- `{}:{}` - {}", issue.file, issue.line, issue.description)?;
        }
        if issues.len() > ISSUES_PER_KIND {
            writeln!(out, "- ... and {} more", issues.len() - ISSUES_PER_KIND)?;
        }
        writeln!(out)?;
    }

    let savings = report.potential_savings();
    writeln!(out, "## Estimated Savings")?;
    writeln!(out)?;
    writeln!(out, "- Duplicate lines: ~{}", savings.duplicate_lines)?;
    writeln!(out, "- Unused files: ~{}", savings.unused_files_count)?;
    writeln!(out, "- Disk space: ~{} KB", kilobytes(savings.unused_files_size))?;
    Ok(())
}

fn preview(code: &str) -> String {
    match code.char_indices().nth(CODE_PREVIEW) {
        Some((cut, _)) => format!("{}...", &code[..cut]),
        None => code.to_string(),
    }
}

fn kilobytes(bytes: u64) -> String {
    format!("{:.1}", bytes as f64 / 1024.0)
}

/// `long_line` → `Long Line`.
fn title(kind: IssueKind) -> String {
    kind.as_str()
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
