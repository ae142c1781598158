//! Scan configuration and box definitions

use crate::dir::DirBox;
use crate::error::BoxError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// How directory boxes are scanned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Extension of metadata files, without the dot
    pub extension: String,
    /// Skip unreadable metadata files with a warning instead of failing
    pub skip_invalid: bool,
}

impl ScanConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With metadata file extension
    #[inline]
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// With invalid entry handling
    #[inline]
    #[must_use]
    pub fn with_skip_invalid(mut self, skip: bool) -> Self {
        self.skip_invalid = skip;
        self
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extension: "xmeta".to_string(),
            skip_invalid: true,
        }
    }
}

/// Named box directory, written `NAME=DIR`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxSpec {
    pub name: String,
    pub directory: PathBuf,
}

impl BoxSpec {
    /// Directory box for this definition
    #[must_use]
    pub fn open(&self, config: &ScanConfig) -> DirBox {
        DirBox::new(self.name.clone(), self.directory.clone()).with_config(config.clone())
    }
}

impl FromStr for BoxSpec {
    type Err = BoxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((name, directory)) if !name.is_empty() && !directory.is_empty() => Ok(Self {
                name: name.to_string(),
                directory: PathBuf::from(directory),
            }),
            _ => Err(BoxError::InvalidSpec(s.to_string())),
        }
    }
}
