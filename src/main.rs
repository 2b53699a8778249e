//! dirscan - list the files under a directory that match glob filters.
//!
//! Usage:
//!   dirscan [PATH]                       Every file under PATH
//!   dirscan PATH -i '*.rs' -e '*/target/*'
//!   dirscan PATH --format json           Full report as JSON
//!   dirscan --help                       Show help

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use dirscan_scan::{DirectoryScanner, ScanConfig, ScanReport};

#[derive(Parser)]
#[command(
    name = "dirscan",
    version,
    about = "Recursively list files matching include/exclude glob patterns",
    long_about = "dirscan walks PATH depth-first and prints every file whose full path \
                  matches at least one --include pattern and no --exclude pattern.\n\n\
                  Patterns are matched against the whole path, so `*` also matches `/`. \
                  Without --include every file is a candidate. Excludes always win."
)]
struct Cli {
    /// Directory to scan (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Include pattern (repeatable)
    #[arg(short, long = "include", value_name = "GLOB")]
    includes: Vec<String>,

    /// Exclude pattern (repeatable)
    #[arg(short, long = "exclude", value_name = "GLOB")]
    excludes: Vec<String>,

    /// Match patterns case-insensitively
    #[arg(long)]
    ignore_case: bool,

    /// Do not descend into directories matching an exclude pattern
    #[arg(long)]
    prune: bool,

    /// Follow symbolic links into directories
    #[arg(short = 'L', long)]
    follow: bool,

    /// Skip entries whose name starts with a dot
    #[arg(long)]
    no_hidden: bool,

    /// Maximum depth to descend (direct children are depth 1)
    #[arg(short = 'd', long)]
    max_depth: Option<usize>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Print walk statistics to stderr
    #[arg(long)]
    stats: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = ScanConfig::builder()
        .case_insensitive(cli.ignore_case)
        .prune_excluded_dirs(cli.prune)
        .follow_symlinks(cli.follow)
        .include_hidden(!cli.no_hidden)
        .max_depth(cli.max_depth)
        .build()
        .wrap_err("Invalid options")?;

    let mut scanner = DirectoryScanner::with_config(config);
    scanner
        .set_includes(&cli.includes)
        .wrap_err("Invalid include pattern")?;
    scanner
        .set_excludes(&cli.excludes)
        .wrap_err("Invalid exclude pattern")?;

    match cli.format {
        OutputFormat::Text => run_text(&scanner, &cli.path, cli.stats),
        OutputFormat::Json => run_json(&scanner, &cli.path),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

/// Stream matching paths to stdout as they are found.
fn run_text(scanner: &DirectoryScanner, path: &Path, show_stats: bool) -> Result<()> {
    let mut walk = scanner
        .scan(path)
        .wrap_err_with(|| format!("Cannot scan {}", path.display()))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for entry in walk.by_ref() {
        if let Err(err) = writeln!(out, "{}", entry.path.display()) {
            // Downstream closed (e.g. piped into `head`); stop walking.
            if err.kind() == std::io::ErrorKind::BrokenPipe {
                return Ok(());
            }
            return Err(err.into());
        }
    }
    out.flush()?;

    if show_stats {
        let stats = walk.stats();
        eprintln!();
        eprintln!("{}", "─".repeat(40));
        eprintln!(" {} matched of {} files", stats.matched, stats.candidates);
        eprintln!(
            " {} excluded, {} not included",
            stats.excluded, stats.not_included
        );
        eprintln!(
            " {} directories visited, {} pruned",
            stats.dirs_visited, stats.dirs_pruned
        );
        eprintln!("{}", "─".repeat(40));
    }

    if !walk.warnings().is_empty() {
        eprintln!("{} entries skipped during scan", walk.warnings().len());
    }

    Ok(())
}

/// Drain the scan and print the whole report as JSON.
fn run_json(scanner: &DirectoryScanner, path: &Path) -> Result<()> {
    let report: ScanReport = scanner
        .collect_report(path)
        .wrap_err_with(|| format!("Cannot scan {}", path.display()))?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
