//! Error types for snapshot input/output
//!
//! Building graphs and resolving freshness cannot fail: inconsistent data is
//! reported through [`Diagnostic`](crate::Diagnostic)s instead. Only reading
//! and writing snapshots produce errors.

use std::path::{Path, PathBuf};

/// Errors while reading or writing snapshots
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Snapshot file does not exist
    #[error("snapshot not found: {}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any other IO failure
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot text is not a valid bead list
    #[error("invalid snapshot at {location}: {message}")]
    Deserialization { location: String, message: String },

    /// Beads could not be rendered as snapshot text
    #[error("cannot encode snapshot: {0}")]
    Serialization(String),
}

impl SnapshotError {
    /// Classify an IO error for `path`
    pub fn io_error(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path, source }
        } else {
            Self::Io { path, source }
        }
    }

    /// Create deserialization error at a location inside the document
    pub fn deserialization(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Deserialization {
            location: location.into(),
            message: message.into(),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    #[inline]
    #[must_use]
    pub fn is_deserialization(&self) -> bool {
        matches!(self, Self::Deserialization { .. })
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(err: serde_json::Error) -> Self {
        Self::deserialization(format!("line {} column {}", err.line(), err.column()), err.to_string())
    }
}

/// Result type alias for snapshot operations
pub type SnapshotResult<T> = Result<T, SnapshotError>;
