mod render;

use anatomist::{AnalysisConfig, Analyzer};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use common::AnalysisReport;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "tidy")]
#[command(about = "Find duplicate code, unused files and style issues in Python trees", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Log debug output to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,
    /// Only log errors.
    #[arg(long, short, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis and print a summary.
    Scan {
        /// Python project root to analyse.
        path: PathBuf,
        /// Write the full report as JSON.
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,
        /// Write the report as markdown.
        #[arg(long, value_name = "FILE")]
        markdown: Option<PathBuf>,
        #[command(flatten)]
        overrides: ConfigArgs,
    },
    /// Print exact-duplicate functions and classes only.
    Dedup {
        /// Python project root to analyse.
        path: PathBuf,
        #[command(flatten)]
        overrides: ConfigArgs,
    },
}

#[derive(Args)]
struct ConfigArgs {
    /// TOML config file (default: `tidy.toml` at the root, if present).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Additional directory name to skip (repeatable).
    #[arg(long, value_name = "DIR")]
    exclude: Vec<String>,
    /// Additional file name never reported as unused (repeatable).
    #[arg(long, value_name = "FILE")]
    entry_point: Vec<String>,
    #[arg(long)]
    max_line_length: Option<usize>,
    /// Stop after this many files.
    #[arg(long)]
    max_files: Option<usize>,
    /// Worker threads for extraction.
    #[arg(long)]
    jobs: Option<usize>,
}

impl ConfigArgs {
    fn load(&self, root: &Path) -> anyhow::Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_file(path)?,
            None => AnalysisConfig::from_default_locations(root)?,
        };
        config.exclude_dirs.extend(self.exclude.iter().cloned());
        config.entry_points.extend(self.entry_point.iter().cloned());
        if let Some(limit) = self.max_line_length {
            config.max_line_length = limit;
        }
        if self.max_files.is_some() {
            config.max_files = self.max_files;
        }
        if self.jobs.is_some() {
            config.jobs = self.jobs;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match &cli.command {
        Commands::Scan {
            path,
            json,
            markdown,
            overrides,
        } => cmd_scan(path, json.as_deref(), markdown.as_deref(), overrides)?,
        Commands::Dedup { path, overrides } => cmd_dedup(path, overrides)?,
    }

    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn analyze(path: &Path, overrides: &ConfigArgs) -> anyhow::Result<AnalysisReport> {
    let config = overrides.load(path)?;
    tracing::debug!(?config, "effective configuration");
    let analyzer = Analyzer::new(config)?;
    Ok(analyzer.analyze(path)?)
}

// ---------------------------------------------------------------------------
// scan
// ---------------------------------------------------------------------------

fn cmd_scan(
    path: &Path,
    json: Option<&Path>,
    markdown: Option<&Path>,
    overrides: &ConfigArgs,
) -> anyhow::Result<()> {
    let report = analyze(path, overrides)?;

    println!("+------------------------------------------+");
    println!("| TIDY SCAN                                |");
    println!("+------------------------------------------+");
    println!("| Files scanned    : {:>20} |", report.files_scanned());
    println!("| Lines scanned    : {:>20} |", report.lines_scanned());
    println!("| Duplicate groups : {:>20} |", report.duplicates().len());
    println!("| Duplicate lines  : {:>20} |", report.duplicate_lines());
    println!("| Unused files     : {:>20} |", report.unused_files().len());
    println!("| Issues           : {:>20} |", report.issues().len());
    println!("+------------------------------------------+");

    if report.unused_files().is_empty() {
        println!("No unused files detected.");
    } else {
        println!("\nUNUSED FILES:");
        for unused in report.unused_files() {
            println!("  {} ({} bytes)", unused.file, unused.size);
        }
    }

    if let Some(out) = json {
        let body = serde_json::to_string_pretty(&report)?;
        fs::write(out, body).with_context(|| format!("writing {}", out.display()))?;
        println!("\nJSON report written to {}", out.display());
    }
    if let Some(out) = markdown {
        let body = render::markdown(&report)?;
        fs::write(out, body)
            .with_context(|| format!("writing {}", out.display()))?;
        println!("Markdown report written to {}", out.display());
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// dedup
// ---------------------------------------------------------------------------

fn cmd_dedup(path: &Path, overrides: &ConfigArgs) -> anyhow::Result<()> {
    let report = analyze(path, overrides)?;

    if report.duplicates().is_empty() {
        println!("No duplicate functions or classes found.");
        return Ok(());
    }

    println!("+------------------------------------------+");
    println!("| TIDY DEDUP                               |");
    println!("+------------------------------------------+");
    println!("| Duplicate groups : {:>20} |", report.duplicates().len());
    println!("| Duplicate lines  : {:>20} |", report.duplicate_lines());
    println!("+------------------------------------------+");

    for group in report.duplicates() {
        println!("\n  Digest: {} ({})", group.digest, group.kind);
        for loc in &group.locations {
            println!("    {}:{}-{}", loc.file, loc.start_line, loc.end_line);
        }
    }

    Ok(())
}
