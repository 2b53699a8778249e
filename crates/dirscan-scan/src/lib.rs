//! Recursive include/exclude directory scanning for dirscan.
//!
//! # Overview
//!
//! `dirscan-scan` walks a directory tree depth-first and yields the files
//! whose path matches at least one include pattern and no exclude pattern.
//!
//! - **Lazy** traversal: the walk advances only as the caller pulls entries
//! - **Exclude wins**: a path matching both lists is never emitted
//! - **Empty includes** behave like the single pattern `*`
//! - **Tolerant**: unreadable entries are skipped and reported as warnings
//!
//! Directories are always descended into unless
//! [`ScanConfig::prune_excluded_dirs`] is set.
//!
//! # Example
//!
//! ```rust,no_run
//! use dirscan_scan::DirectoryScanner;
//!
//! let mut scanner = DirectoryScanner::new();
//! scanner.add_include("*.txt").unwrap();
//! scanner.add_exclude("*/target/*").unwrap();
//!
//! for entry in scanner.scan("/path/to/scan").unwrap() {
//!     println!("{}", entry.path.display());
//! }
//! ```

mod scanner;
mod walk;

pub use scanner::DirectoryScanner;
pub use walk::FilteredWalk;

// Re-export core types for convenience
pub use dirscan_core::{
    DEFAULT_INCLUDE, EntryKind, ErrorCode, FileEntry, FileFilter, FilterVerdict, Pattern,
    PatternList, ScanConfig, ScanConfigBuilder, ScanError, ScanReport, ScanWarning, WalkStats,
    WarningKind, any_matches, matches,
};
