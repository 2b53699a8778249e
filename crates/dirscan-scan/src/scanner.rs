//! Configurable include/exclude directory scanner.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Instant, SystemTime};

use jwalk::{Parallelism, WalkDir};

use dirscan_core::{
    FileEntry, FileFilter, Pattern, PatternList, ScanConfig, ScanError, ScanReport,
};

use crate::walk::FilteredWalk;

/// Recursive scanner that yields the files under a root matching a set of
/// include patterns and none of a set of exclude patterns.
///
/// An empty include list means "everything". Excludes always win over
/// includes. The pattern lists are copied when a scan starts, so changing
/// them does not affect walks already in progress.
#[derive(Debug, Clone, Default)]
pub struct DirectoryScanner {
    includes: PatternList,
    excludes: PatternList,
    config: ScanConfig,
}

impl DirectoryScanner {
    /// Create a scanner with default options and no patterns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scanner with the given options and no patterns.
    pub fn with_config(config: ScanConfig) -> Self {
        Self {
            includes: PatternList::new(),
            excludes: PatternList::new(),
            config,
        }
    }

    /// Current options.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Mutable access to the options.
    pub fn config_mut(&mut self) -> &mut ScanConfig {
        &mut self.config
    }

    /// Add an include pattern.
    pub fn add_include(&mut self, pattern: &str) -> Result<(), ScanError> {
        self.includes.push(Pattern::new(pattern)?);
        Ok(())
    }

    /// Add an exclude pattern.
    pub fn add_exclude(&mut self, pattern: &str) -> Result<(), ScanError> {
        self.excludes.push(Pattern::new(pattern)?);
        Ok(())
    }

    /// Replace the include list. On error the old list is kept.
    pub fn set_includes<I, S>(&mut self, patterns: I) -> Result<(), ScanError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.includes = PatternList::from_patterns(patterns)?;
        Ok(())
    }

    /// Replace the exclude list. On error the old list is kept.
    pub fn set_excludes<I, S>(&mut self, patterns: I) -> Result<(), ScanError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.excludes = PatternList::from_patterns(patterns)?;
        Ok(())
    }

    /// Current include patterns.
    pub fn includes(&self) -> &PatternList {
        &self.includes
    }

    /// Current exclude patterns.
    pub fn excludes(&self) -> &PatternList {
        &self.excludes
    }

    /// Start a lazy scan of `root`.
    ///
    /// Fails before touching the tree if `root` does not exist or is not a
    /// directory.
    pub fn scan(&self, root: impl AsRef<Path>) -> Result<FilteredWalk, ScanError> {
        let root = root.as_ref();

        let metadata = std::fs::metadata(root).map_err(|e| ScanError::io(root, e))?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        let filter = Arc::new(FileFilter::compile(
            &self.includes,
            &self.excludes,
            self.config.case_insensitive,
        )?);
        let pruned = Arc::new(AtomicU64::new(0));

        tracing::debug!(
            root = %root.display(),
            includes = ?self.includes.to_strings(),
            excludes = ?self.excludes.to_strings(),
            "Starting scan"
        );

        let mut walker = WalkDir::new(root)
            .parallelism(Parallelism::Serial)
            .sort(self.config.sort)
            .skip_hidden(!self.config.include_hidden)
            .follow_links(self.config.follow_symlinks)
            .min_depth(0)
            .max_depth(self.config.max_depth.unwrap_or(usize::MAX));

        if self.config.prune_excluded_dirs {
            let filter = Arc::clone(&filter);
            let pruned = Arc::clone(&pruned);
            walker = walker.process_read_dir(move |depth, _dir, _state, children| {
                // `None` is the read that yields the root itself; it is never pruned.
                if depth.is_none() {
                    return;
                }
                for child in children.iter_mut().flatten() {
                    if child.file_type().is_dir() && filter.is_excluded(child.path()) {
                        tracing::debug!(path = %child.path().display(), "Pruning excluded directory");
                        child.read_children_path = None;
                        pruned.fetch_add(1, Ordering::Relaxed);
                    }
                }
            });
        }

        Ok(FilteredWalk::new(
            root.to_path_buf(),
            walker.into_iter(),
            filter,
            pruned,
        ))
    }

    /// Scan `root` and collect every matching entry in traversal order.
    pub fn collect(&self, root: impl AsRef<Path>) -> Result<Vec<FileEntry>, ScanError> {
        Ok(self.scan(root)?.collect())
    }

    /// Scan `root` and collect entries, warnings and counters.
    pub fn collect_report(&self, root: impl AsRef<Path>) -> Result<ScanReport, ScanError> {
        let scanned_at = SystemTime::now();
        let start = Instant::now();

        let mut walk = self.scan(root)?;
        let entries: Vec<FileEntry> = walk.by_ref().collect();
        let stats = walk.stats();
        let root = walk.root().to_path_buf();
        let warnings = walk.into_warnings();
        let scan_duration = start.elapsed();

        tracing::debug!(
            root = %root.display(),
            matched = stats.matched,
            warnings = warnings.len(),
            elapsed_ms = scan_duration.as_millis() as u64,
            "Scan finished"
        );

        Ok(ScanReport {
            root,
            entries,
            scanned_at,
            scan_duration,
            stats,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("sub")).unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::write(root.join("b.log"), "b").unwrap();
        fs::write(root.join("sub/c.txt"), "c").unwrap();

        temp
    }

    fn names(entries: &[FileEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_basic_scan() {
        let temp = create_test_tree();
        let scanner = DirectoryScanner::new();

        let entries = scanner.collect(temp.path()).unwrap();
        assert_eq!(names(&entries), vec!["a.txt", "b.log", "c.txt"]);
    }

    #[test]
    fn test_include_pattern() {
        let temp = create_test_tree();
        let mut scanner = DirectoryScanner::new();
        scanner.add_include("*.txt").unwrap();

        let entries = scanner.collect(temp.path()).unwrap();
        assert_eq!(names(&entries), vec!["a.txt", "c.txt"]);
    }

    #[test]
    fn test_add_invalid_pattern_keeps_list() {
        let mut scanner = DirectoryScanner::new();
        scanner.add_include("*.rs").unwrap();
        assert!(scanner.add_include("[bad").is_err());
        assert!(scanner.set_includes(["*.md", "{bad"]).is_err());
        assert_eq!(scanner.includes().to_strings(), vec!["*.rs"]);
    }

    #[test]
    fn test_missing_root() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");

        let err = DirectoryScanner::new().scan(&missing).err().unwrap();
        assert!(matches!(err, ScanError::NotFound { ref path } if *path == missing));
    }

    #[test]
    fn test_file_root_rejected() {
        let temp = create_test_tree();
        let err = DirectoryScanner::new()
            .collect(temp.path().join("a.txt"))
            .unwrap_err();
        assert!(matches!(err, ScanError::NotADirectory { .. }));
    }

    #[test]
    fn test_report_counts() {
        let temp = create_test_tree();
        let mut scanner = DirectoryScanner::new();
        scanner.add_include("*.txt").unwrap();
        scanner.add_exclude("*/sub/*").unwrap();

        let report = scanner.collect_report(temp.path()).unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.stats.candidates, 3);
        assert_eq!(report.stats.matched, 1);
        assert_eq!(report.stats.excluded, 1);
        assert_eq!(report.stats.not_included, 1);
        assert_eq!(report.stats.dirs_visited, 2);
        assert!(!report.has_warnings());
    }
}
