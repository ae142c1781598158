//! Bead collections
//!
//! [`BeadCollection`] turns the flat list of records found in boxes (or read
//! from a snapshot) into one logical bead per content id, while keeping
//! every original record and where it was found.

use crate::diagnostic::{Diagnostic, IntegrityWarning};
use bead_meta::{BeadRecord, ContentId};
use indexmap::IndexMap;
use std::collections::HashSet;

/// One logical bead and every box it was found in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedBead {
    record: BeadRecord,
    locations: Vec<String>,
}

impl CollectedBead {
    /// The first record seen for this content id
    #[inline]
    #[must_use]
    pub fn record(&self) -> &BeadRecord {
        &self.record
    }

    /// Boxes holding this bead, in discovery order, without repeats
    #[inline]
    #[must_use]
    pub fn locations(&self) -> &[String] {
        &self.locations
    }
}

/// Records deduplicated by content id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeadCollection {
    origins: Vec<BeadRecord>,
    beads: IndexMap<ContentId, CollectedBead>,
    diagnostics: Vec<Diagnostic>,
}

impl BeadCollection {
    /// Collect records, keeping the first one seen for each content id
    ///
    /// A later record with the same content id but different metadata is
    /// reported as [`IntegrityWarning::ConflictingMetadata`]; its box is
    /// still added to the bead's locations.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = BeadRecord>) -> Self {
        let mut collection = Self::default();
        for record in records {
            collection.insert(record);
        }
        tracing::debug!(
            records = collection.origins.len(),
            beads = collection.beads.len(),
            warnings = collection.diagnostics.len(),
            "collected beads"
        );
        collection
    }

    fn insert(&mut self, record: BeadRecord) {
        if let Some(existing) = self.beads.get_mut(record.content_id()) {
            if !existing.record.same_content_as(&record) {
                let warning = IntegrityWarning::ConflictingMetadata {
                    content_id: record.content_id().clone(),
                    kept_box: existing.record.box_name().to_string(),
                    conflicting_box: record.box_name().to_string(),
                };
                tracing::warn!("{warning}");
                self.diagnostics.push(warning.into());
            }
            if !existing.locations.iter().any(|b| b == record.box_name()) {
                existing.locations.push(record.box_name().to_string());
            }
        } else {
            self.check_input_names(&record);
            self.beads.insert(
                record.content_id().clone(),
                CollectedBead {
                    record: record.clone(),
                    locations: vec![record.box_name().to_string()],
                },
            );
        }
        self.origins.push(record);
    }

    fn check_input_names(&mut self, record: &BeadRecord) {
        let mut seen = HashSet::new();
        for input in record.inputs() {
            if !seen.insert(input.name.as_str()) {
                let warning = IntegrityWarning::DuplicateInputName {
                    content_id: record.content_id().clone(),
                    input: input.name.clone(),
                };
                tracing::warn!("{warning}");
                self.diagnostics.push(warning.into());
            }
        }
    }

    /// Every record as loaded, in load order
    #[inline]
    #[must_use]
    pub fn origins(&self) -> &[BeadRecord] {
        &self.origins
    }

    #[must_use]
    pub fn get(&self, content_id: &str) -> Option<&CollectedBead> {
        self.beads.get(content_id)
    }

    #[must_use]
    pub fn contains(&self, content_id: &str) -> bool {
        self.beads.contains_key(content_id)
    }

    /// Logical beads in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = &CollectedBead> {
        self.beads.values()
    }

    /// Number of logical beads
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.beads.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.beads.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
