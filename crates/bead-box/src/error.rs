//! Error types for box scanning

use bead_meta::MetaError;
use std::path::{Path, PathBuf};

/// Errors while listing the beads of a box
#[derive(Debug, thiserror::Error)]
pub enum BoxError {
    /// Box directory or metadata file could not be read
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Metadata file is not valid JSON of the expected shape
    #[error("invalid bead metadata in {}: {source}", path.display())]
    InvalidMeta {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Metadata values are malformed
    #[error("invalid bead metadata in {}: {source}", path.display())]
    Meta {
        path: PathBuf,
        #[source]
        source: MetaError,
    },

    /// Box definition is not `NAME=DIR`
    #[error("invalid box definition '{0}': expected NAME=DIR")]
    InvalidSpec(String),
}

impl BoxError {
    /// Create IO error for `path`
    pub fn io_error(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Result type alias for box operations
pub type BoxResult<T> = Result<T, BoxError>;
