//! Error and warning types for scanning operations.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that abort a scan or a configuration change.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Root path does not exist.
    #[error("Path '{}' does not exist", path.display())]
    NotFound { path: PathBuf },

    /// Root path exists but cannot be walked as a directory.
    #[error("Root path is not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    /// A pattern could not be parsed as a glob.
    #[error("Invalid glob pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Permission denied for a path.
    #[error("Permission denied: {}", path.display())]
    PermissionDenied { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Machine-checkable reason attached to every [`ScanError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    NotFound,
    NotADirectory,
    InvalidPattern,
    PermissionDenied,
    Io,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotFound => "not-found",
            Self::NotADirectory => "not-a-directory",
            Self::InvalidPattern => "invalid-pattern",
            Self::PermissionDenied => "permission-denied",
            Self::Io => "io",
        };
        f.write_str(name)
    }
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create an invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.to_string(),
        }
    }

    /// The reason code for this error.
    pub fn kind(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::NotADirectory { .. } => ErrorCode::NotADirectory,
            Self::InvalidPattern { .. } => ErrorCode::InvalidPattern,
            Self::PermissionDenied { .. } => ErrorCode::PermissionDenied,
            Self::Io { .. } => ErrorCode::Io,
        }
    }

    /// The path this error refers to, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::NotFound { path }
            | Self::NotADirectory { path }
            | Self::PermissionDenied { path }
            | Self::Io { path, .. } => Some(path.as_path()),
            Self::InvalidPattern { .. } => None,
        }
    }
}

/// Kind of scan warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Permission was denied.
    PermissionDenied,
    /// Error reading a directory or entry.
    ReadError,
    /// Entry disappeared between listing and inspection.
    Vanished,
}

/// Non-fatal problem encountered mid-walk. The entry is skipped, the walk goes on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanWarning {
    /// Path where the warning occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl ScanWarning {
    /// Create a new scan warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create a permission denied warning.
    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("Permission denied: {}", path.display()),
            path,
            kind: WarningKind::PermissionDenied,
        }
    }

    /// Create a read error warning.
    pub fn read_error(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        let path = path.into();
        Self {
            message: format!("Read error: {error}"),
            path,
            kind: WarningKind::ReadError,
        }
    }

    /// Classify an I/O error into the matching warning.
    pub fn from_io(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::PermissionDenied => Self::permission_denied(path),
            std::io::ErrorKind::NotFound => {
                let path = path.into();
                Self {
                    message: format!("Entry vanished during scan: {}", path.display()),
                    path,
                    kind: WarningKind::Vanished,
                }
            }
            _ => Self::read_error(path, error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_error_io() {
        let err = ScanError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, ScanError::PermissionDenied { .. }));
        assert_eq!(err.kind(), ErrorCode::PermissionDenied);
    }

    #[test]
    fn test_not_found_carries_path() {
        let err = ScanError::io(
            "/missing",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.kind(), ErrorCode::NotFound);
        assert_eq!(err.path(), Some(std::path::Path::new("/missing")));
        assert_eq!(err.to_string(), "Path '/missing' does not exist");
    }

    #[test]
    fn test_invalid_pattern_has_no_path() {
        let err = ScanError::invalid_pattern("[abc", "unclosed character class");
        assert_eq!(err.kind(), ErrorCode::InvalidPattern);
        assert!(err.path().is_none());
        assert!(err.to_string().contains("[abc"));
    }

    #[test]
    fn test_scan_warning_creation() {
        let warning = ScanWarning::permission_denied("/test/path");
        assert_eq!(warning.kind, WarningKind::PermissionDenied);
        assert!(warning.message.contains("Permission denied"));
    }

    #[test]
    fn test_warning_from_io() {
        let gone = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(ScanWarning::from_io("/a", &gone).kind, WarningKind::Vanished);

        let other = std::io::Error::other("boom");
        let warning = ScanWarning::from_io("/a", &other);
        assert_eq!(warning.kind, WarningKind::ReadError);
        assert!(warning.message.contains("boom"));
    }
}
