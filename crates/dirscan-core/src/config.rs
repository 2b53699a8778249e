//! Scan configuration types.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Traversal and matching options for a scanner.
///
/// Patterns are not part of the config; they are validated one by one as
/// they are added to a scanner.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Match patterns without regard to ASCII/Unicode case.
    ///
    /// Off by default: `*.TXT` does not match `a.txt`.
    #[builder(default = "false")]
    #[serde(default)]
    pub case_insensitive: bool,

    /// Skip descending into directories whose own path matches an exclude
    /// pattern. Off by default, in which case excludes only filter files.
    #[builder(default = "false")]
    #[serde(default)]
    pub prune_excluded_dirs: bool,

    /// Follow symbolic links into directories.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Include hidden entries (names starting with `.`).
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub include_hidden: bool,

    /// Maximum depth to traverse; direct children of the root are depth 1
    /// (None = unlimited).
    #[builder(default)]
    #[serde(default)]
    pub max_depth: Option<usize>,

    /// Visit directory entries in file-name order.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub sort: bool,
}

fn default_true() -> bool {
    true
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(Some(0)) = self.max_depth {
            return Err("max_depth must be at least 1".to_string());
        }
        Ok(())
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a config with default options.
    pub fn new() -> Self {
        Self {
            case_insensitive: false,
            prune_excluded_dirs: false,
            follow_symlinks: false,
            include_hidden: true,
            max_depth: None,
            sort: true,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new()
    }
}
