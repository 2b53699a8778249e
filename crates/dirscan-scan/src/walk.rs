//! Lazy filtered traversal.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use jwalk::DirEntry;

use dirscan_core::{EntryKind, FileEntry, FileFilter, FilterVerdict, ScanWarning, WalkStats};

type RawEntry = Result<DirEntry<((), ())>, jwalk::Error>;

/// Single-pass sequence of the files under a root that pass the filter.
///
/// Directories are walked depth-first and never yielded. Unreadable entries
/// are skipped and recorded as warnings. Dropping the walk early releases
/// every open directory handle.
pub struct FilteredWalk {
    root: PathBuf,
    entries: Box<dyn Iterator<Item = RawEntry>>,
    filter: Arc<FileFilter>,
    stats: WalkStats,
    pruned: Arc<AtomicU64>,
    warnings: Vec<ScanWarning>,
}

impl FilteredWalk {
    pub(crate) fn new(
        root: PathBuf,
        entries: impl Iterator<Item = RawEntry> + 'static,
        filter: Arc<FileFilter>,
        pruned: Arc<AtomicU64>,
    ) -> Self {
        Self {
            root,
            entries: Box::new(entries),
            filter,
            stats: WalkStats::new(),
            pruned,
            warnings: Vec::new(),
        }
    }

    /// Root this walk started from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Counters so far.
    pub fn stats(&self) -> WalkStats {
        let mut stats = self.stats.clone();
        stats.dirs_pruned = self.pruned.load(Ordering::Relaxed);
        stats
    }

    /// Entries skipped so far.
    pub fn warnings(&self) -> &[ScanWarning] {
        &self.warnings
    }

    /// Consume the walk, returning the collected warnings.
    pub fn into_warnings(self) -> Vec<ScanWarning> {
        self.warnings
    }

    fn warn(&mut self, warning: ScanWarning) {
        tracing::warn!(path = %warning.path.display(), "{}", warning.message);
        self.warnings.push(warning);
    }
}

impl Iterator for FilteredWalk {
    type Item = FileEntry;

    fn next(&mut self) -> Option<FileEntry> {
        loop {
            let entry = match self.entries.next()? {
                Ok(e) => e,
                Err(err) => {
                    let path = err.path().map(|p| p.to_path_buf()).unwrap_or_default();
                    self.warn(jwalk_warning(path, &err));
                    continue;
                }
            };

            let path = entry.path();

            // The root was checked to be a directory before the walk started,
            // even when it is a symlink that jwalk reports as such.
            let kind = if entry.depth() == 0 {
                None
            } else {
                EntryKind::from_file_type(entry.file_type())
            };
            let Some(kind) = kind else {
                self.stats.record_dir(entry.depth());
                if let Some(err) = &entry.read_children_error {
                    self.warn(jwalk_warning(path, err));
                }
                continue;
            };

            let verdict = self.filter.check(&path);
            self.stats.record_candidate(verdict, entry.depth());
            if verdict != FilterVerdict::Matched {
                tracing::trace!(path = %path.display(), ?verdict, "Filtered out");
                continue;
            }

            return Some(FileEntry::new(path, kind, entry.depth()));
        }
    }
}

fn jwalk_warning(path: PathBuf, err: &jwalk::Error) -> ScanWarning {
    match err.io_error() {
        Some(io_err) => ScanWarning::from_io(path, io_err),
        None => ScanWarning::new(path, err.to_string(), dirscan_core::WarningKind::ReadError),
    }
}
