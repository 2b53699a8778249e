//! Shell-style glob patterns and the include/exclude policy.
//!
//! Matching policy:
//!
//! - Patterns are matched against the *whole* path text, so `*` and `?`
//!   also match the path separator: `*.txt` matches `/data/sub/c.txt`.
//! - `[...]` matches one character from a class or range; `[!...]` negates.
//! - Matching is case-sensitive unless the scan asks for case folding.
//! - Paths are matched with the host's native separator, as reported by the
//!   walk. No normalization is applied.
//! - The `globset` extensions (`**`, `{a,b}`, `\` escapes on Unix) are
//!   accepted as well.
//!
//! Patterns are validated when they are constructed, so a malformed pattern
//! (for example an unclosed `[`) is rejected at configuration time rather
//! than silently failing to match during a scan.

use std::fmt;
use std::path::Path;

use globset::{Glob, GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};

use crate::error::ScanError;

/// Pattern used in place of an empty include list.
pub const DEFAULT_INCLUDE: &str = "*";

/// A validated glob pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    matcher: GlobMatcher,
}

impl Pattern {
    /// Parse and validate a glob pattern.
    pub fn new(pattern: &str) -> Result<Self, ScanError> {
        let glob = build_glob(pattern, false)?;
        Ok(Self {
            matcher: glob.compile_matcher(),
        })
    }

    /// The pattern text as it was given.
    pub fn as_str(&self) -> &str {
        self.matcher.glob().glob()
    }

    /// Check whether `path` matches this pattern (case-sensitive).
    pub fn matches(&self, path: impl AsRef<Path>) -> bool {
        self.matcher.is_match(path)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Pattern {}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Pattern {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Check whether `path` matches the glob `pattern`.
///
/// Fails only if `pattern` is not a valid glob.
pub fn matches(path: impl AsRef<Path>, pattern: &str) -> Result<bool, ScanError> {
    Ok(Pattern::new(pattern)?.matches(path))
}

/// Check whether `path` matches at least one of `patterns`.
///
/// An empty sequence matches nothing; the "empty include list means
/// everything" rule belongs to the scanner, not here.
pub fn any_matches<'a, I>(path: impl AsRef<Path>, patterns: I) -> Result<bool, ScanError>
where
    I: IntoIterator<Item = &'a str>,
{
    let list = PatternList::from_patterns(patterns)?;
    Ok(list.any_matches(path))
}

/// Ordered list of validated patterns.
///
/// Order is kept for read-back only; matching is existential.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternList {
    patterns: Vec<Pattern>,
}

impl PatternList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate every pattern, failing on the first bad one.
    pub fn from_patterns<I, S>(patterns: I) -> Result<Self, ScanError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| Pattern::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Append an already validated pattern.
    pub fn push(&mut self, pattern: Pattern) {
        self.patterns.push(pattern);
    }

    /// Iterate over the patterns in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }

    /// The pattern strings in insertion order.
    pub fn to_strings(&self) -> Vec<String> {
        self.patterns.iter().map(|p| p.as_str().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// True iff at least one pattern matches; false for an empty list.
    pub fn any_matches(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        self.patterns.iter().any(|p| p.matches(path))
    }

    /// Compile into a single matcher for one scan.
    pub fn compile(&self, case_insensitive: bool) -> Result<GlobSet, ScanError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.patterns {
            builder.add(build_glob(pattern.as_str(), case_insensitive)?);
        }
        builder
            .build()
            .map_err(|e| ScanError::invalid_pattern(self.to_strings().join(", "), e))
    }
}

impl<'a> IntoIterator for &'a PatternList {
    type Item = &'a Pattern;
    type IntoIter = std::slice::Iter<'a, Pattern>;

    fn into_iter(self) -> Self::IntoIter {
        self.patterns.iter()
    }
}

fn build_glob(pattern: &str, case_insensitive: bool) -> Result<Glob, ScanError> {
    GlobBuilder::new(pattern)
        .literal_separator(false)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|e| ScanError::invalid_pattern(pattern, e.kind()))
}

/// Outcome of testing one candidate path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterVerdict {
    /// Passes the filter and is emitted.
    Matched,
    /// Matched an exclude pattern (regardless of includes).
    Excluded,
    /// Matched no include pattern.
    NotIncluded,
}

/// Include/exclude filter compiled for a single scan.
///
/// Exclude always dominates include.
#[derive(Debug, Clone)]
pub struct FileFilter {
    include: GlobSet,
    exclude: GlobSet,
}

impl FileFilter {
    /// Compile the filter. An empty include list is treated as
    /// [`DEFAULT_INCLUDE`].
    pub fn compile(
        includes: &PatternList,
        excludes: &PatternList,
        case_insensitive: bool,
    ) -> Result<Self, ScanError> {
        let include = if includes.is_empty() {
            PatternList::from_patterns([DEFAULT_INCLUDE])?.compile(case_insensitive)?
        } else {
            includes.compile(case_insensitive)?
        };
        let exclude = excludes.compile(case_insensitive)?;
        Ok(Self { include, exclude })
    }

    /// Decide whether `path` is emitted.
    pub fn check(&self, path: impl AsRef<Path>) -> FilterVerdict {
        let path = path.as_ref();
        if self.exclude.is_match(path) {
            FilterVerdict::Excluded
        } else if self.include.is_match(path) {
            FilterVerdict::Matched
        } else {
            FilterVerdict::NotIncluded
        }
    }

    /// True if `path` matches any exclude pattern.
    pub fn is_excluded(&self, path: impl AsRef<Path>) -> bool {
        self.exclude.is_match(path)
    }

    /// True if `path` passes the filter.
    pub fn accepts(&self, path: impl AsRef<Path>) -> bool {
        self.check(path) == FilterVerdict::Matched
    }
}
