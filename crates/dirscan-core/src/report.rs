//! Walk statistics and materialized scan results.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::entry::FileEntry;
use crate::error::ScanWarning;
use crate::pattern::FilterVerdict;

/// Counters for a single walk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkStats {
    /// Directories visited, including the root.
    pub dirs_visited: u64,
    /// Non-directory entries tested against the filter.
    pub candidates: u64,
    /// Candidates emitted.
    pub matched: u64,
    /// Candidates dropped by an exclude pattern.
    pub excluded: u64,
    /// Candidates that matched no include pattern.
    pub not_included: u64,
    /// Directories not descended into because they were excluded.
    pub dirs_pruned: u64,
    /// Deepest level reached.
    pub max_depth: usize,
}

impl WalkStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a visited directory.
    pub fn record_dir(&mut self, depth: usize) {
        self.dirs_visited += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Record a tested candidate and its verdict.
    pub fn record_candidate(&mut self, verdict: FilterVerdict, depth: usize) {
        self.candidates += 1;
        self.max_depth = self.max_depth.max(depth);
        match verdict {
            FilterVerdict::Matched => self.matched += 1,
            FilterVerdict::Excluded => self.excluded += 1,
            FilterVerdict::NotIncluded => self.not_included += 1,
        }
    }
}

/// Fully drained scan with everything observed along the way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Root path that was scanned.
    pub root: PathBuf,

    /// Emitted entries in traversal order.
    pub entries: Vec<FileEntry>,

    /// When this scan was started.
    pub scanned_at: SystemTime,

    /// Duration of the scan.
    pub scan_duration: Duration,

    /// Walk counters.
    pub stats: WalkStats,

    /// Entries skipped because they could not be read.
    pub warnings: Vec<ScanWarning>,
}

impl ScanReport {
    /// Number of emitted entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if any entry was skipped.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Iterate over the emitted paths.
    pub fn paths(&self) -> impl Iterator<Item = &std::path::Path> {
        self.entries.iter().map(|e| e.path.as_path())
    }
}
