//! Entries produced by a scan.

use std::path::{Path, PathBuf};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Kind of a non-directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Symbolic link that was not followed.
    Symlink,
    /// Anything else: fifo, socket, device node.
    Other,
}

impl EntryKind {
    /// Check if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File)
    }

    /// Check if this is a symlink.
    pub fn is_symlink(&self) -> bool {
        matches!(self, Self::Symlink)
    }

    /// Classify a file type. Returns `None` for directories, which are never
    /// emitted.
    pub fn from_file_type(file_type: std::fs::FileType) -> Option<Self> {
        if file_type.is_dir() {
            None
        } else if file_type.is_symlink() {
            Some(Self::Symlink)
        } else if file_type.is_file() {
            Some(Self::File)
        } else {
            Some(Self::Other)
        }
    }
}

/// A file discovered by the walk. Owned by the caller once yielded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileEntry {
    /// Full path, rooted at the scan root exactly as it was given.
    pub path: PathBuf,
    /// File name component.
    pub name: CompactString,
    /// Entry kind.
    pub kind: EntryKind,
    /// Depth below the root (direct children are 1).
    pub depth: usize,
}

impl FileEntry {
    /// Create a new entry.
    pub fn new(path: impl Into<PathBuf>, kind: EntryKind, depth: usize) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| CompactString::new(n.to_string_lossy()))
            .unwrap_or_default();
        Self {
            path,
            name,
            kind,
            depth,
        }
    }

    /// Path of the entry.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Consume the entry, keeping only its path.
    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

impl AsRef<Path> for FileEntry {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}
