//! Bead names
//!
//! Versions of "the same" bead share a [`BeadName`]. Archive files carry the
//! name followed by an optional freeze timestamp suffix.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{self, Display, Formatter};
use std::path::Path;

static TIMESTAMP_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)_[0-9]{8}(?:t[-+0-9]*)?$").expect("timestamp suffix pattern is valid")
});

/// Name grouping the versions of a bead (case-sensitive)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct BeadName(String);

impl BeadName {
    /// Create a name
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the underlying string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for BeadName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BeadName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for BeadName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Parse a bead name from an archive file path
///
/// Drops the directory and the extension, then a trailing `_YYYYMMDD` or
/// `_YYYYMMDDThhmmssffffff±zzzz` timestamp. Might return a simpler name
/// than intended when the name itself ends in such a pattern.
#[must_use]
pub fn bead_name_from_file_path(path: impl AsRef<Path>) -> BeadName {
    let stem = path
        .as_ref()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    BeadName(TIMESTAMP_SUFFIX.replace(&stem, "").into_owned())
}
