//! Core types for dirscan.
//!
//! This crate provides the data model and matching policy used by the
//! scanner: glob patterns, the include/exclude filter, file entries,
//! configuration, errors and walk statistics.

mod config;
mod entry;
mod error;
mod pattern;
mod report;

pub use config::{ScanConfig, ScanConfigBuilder, ScanConfigBuilderError};
pub use entry::{EntryKind, FileEntry};
pub use error::{ErrorCode, ScanError, ScanWarning, WarningKind};
pub use pattern::{
    DEFAULT_INCLUDE, FileFilter, FilterVerdict, Pattern, PatternList, any_matches, matches,
};
pub use report::{ScanReport, WalkStats};
