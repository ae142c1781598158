//! Directory boxes
//!
//! A directory box is a flat directory of bead archives. Each archive may be
//! accompanied by a metadata sidecar, `<archive>.<extension>`, holding the
//! bead's content id, kind, freeze time and inputs as JSON. Only sidecars are
//! read; any other file in the directory is ignored.

use crate::config::ScanConfig;
use crate::error::{BoxError, BoxResult};
use crate::source::BeadSource;
use bead_meta::{bead_name_from_file_path, BeadRecord, ContentId, FreezeTime, InputSpec, MetaError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Sidecar content
#[derive(Debug, Deserialize)]
struct XMeta {
    content_id: String,
    kind: String,
    freeze_time: String,
    #[serde(default)]
    inputs: Vec<XMetaInput>,
}

#[derive(Debug, Deserialize)]
struct XMetaInput {
    name: String,
    kind: String,
    content_id: String,
    freeze_time: String,
}

/// Box backed by a directory of metadata sidecars
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirBox {
    name: String,
    directory: PathBuf,
    config: ScanConfig,
}

impl DirBox {
    #[must_use]
    pub fn new(name: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            directory: directory.into(),
            config: ScanConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Sidecar files of the box, ordered by file name
    fn sidecars(&self) -> BoxResult<Vec<PathBuf>> {
        let entries =
            std::fs::read_dir(&self.directory).map_err(|e| BoxError::io_error(&self.directory, e))?;
        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| BoxError::io_error(&self.directory, e))?.path();
            let is_sidecar = path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext == self.config.extension.as_str());
            if is_sidecar {
                paths.push(path);
            } else {
                tracing::trace!(path = %path.display(), "ignoring non-metadata entry");
            }
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(paths)
    }

    fn read_sidecar(&self, path: &Path) -> BoxResult<BeadRecord> {
        let text = std::fs::read_to_string(path).map_err(|e| BoxError::io_error(path, e))?;
        let meta: XMeta = serde_json::from_str(&text).map_err(|source| BoxError::InvalidMeta {
            path: path.to_path_buf(),
            source,
        })?;
        let meta_error = |source: MetaError| BoxError::Meta {
            path: path.to_path_buf(),
            source,
        };

        // `<archive>.xmeta` names the bead like `<archive>` would
        let archive = path.with_extension("");
        let name = bead_name_from_file_path(&archive);
        if name.as_str().is_empty() {
            return Err(meta_error(MetaError::InvalidName(archive.display().to_string())));
        }

        let inputs = meta
            .inputs
            .into_iter()
            .map(|input| {
                let freeze_time = FreezeTime::parse(&input.freeze_time).map_err(meta_error)?;
                Ok::<_, BoxError>(InputSpec::new(
                    input.name,
                    input.kind,
                    ContentId::new(input.content_id),
                    freeze_time,
                ))
            })
            .collect::<BoxResult<Vec<_>>>()?;

        Ok(BeadRecord::new(
            name,
            meta.kind,
            self.name.clone(),
            ContentId::new(meta.content_id),
            FreezeTime::parse(&meta.freeze_time).map_err(meta_error)?,
            inputs,
        ))
    }
}

impl BeadSource for DirBox {
    fn name(&self) -> &str {
        &self.name
    }

    fn beads(&self) -> BoxResult<Vec<BeadRecord>> {
        let mut beads = Vec::new();
        for path in self.sidecars()? {
            match self.read_sidecar(&path) {
                Ok(bead) => beads.push(bead),
                Err(err) if self.config.skip_invalid => {
                    tracing::warn!(box_name = %self.name, "skipping {err}");
                }
                Err(err) => return Err(err),
            }
        }
        tracing::debug!(
            box_name = %self.name,
            directory = %self.directory.display(),
            beads = beads.len(),
            "scanned box"
        );
        Ok(beads)
    }
}
