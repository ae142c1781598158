//! Bead sources

use crate::error::BoxResult;
use bead_meta::BeadRecord;

/// A named place beads can be listed from
pub trait BeadSource {
    /// Box name recorded on every bead found here
    fn name(&self) -> &str;

    /// List all beads in the box
    ///
    /// # Errors
    /// Returns error if the box cannot be read
    fn beads(&self) -> BoxResult<Vec<BeadRecord>>;
}

/// Box holding its records in memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryBox {
    name: String,
    beads: Vec<BeadRecord>,
}

impl MemoryBox {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            beads: Vec::new(),
        }
    }

    /// With a bead, moved into this box
    #[must_use]
    pub fn with_bead(mut self, bead: &BeadRecord) -> Self {
        self.add(bead);
        self
    }

    /// Store a copy of `bead` in this box
    pub fn add(&mut self, bead: &BeadRecord) {
        self.beads.push(bead.relocated(self.name.clone()));
    }

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
}

impl BeadSource for MemoryBox {
    fn name(&self) -> &str {
        &self.name
    }

    fn beads(&self) -> BoxResult<Vec<BeadRecord>> {
        Ok(self.beads.clone())
    }
}

/// Records of all `sources`, box by box in the given order
///
/// # Errors
/// Returns the first error raised by a source
pub fn load_boxes(sources: &[&dyn BeadSource]) -> BoxResult<Vec<BeadRecord>> {
    let mut records = Vec::new();
    for source in sources {
        let beads = source.beads()?;
        tracing::debug!(box_name = source.name(), beads = beads.len(), "loaded box");
        records.extend(beads);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bead_meta::{BeadName, ContentId, FreezeTime};

    fn record(id: &str) -> BeadRecord {
        BeadRecord::new(
            BeadName::new("bead"),
            "kind",
            "",
            ContentId::new(id),
            FreezeTime::parse("20160704T000000000000+0200").unwrap(),
            Vec::new(),
        )
    }

    #[test]
    fn memory_box_relocates_beads() {
        let mut main = MemoryBox::new("main");
        main.add(&record("id_1"));
        let beads = main.beads().unwrap();
        assert_eq!(beads[0].box_name(), "main");
        assert_eq!(main.len(), 1);
    }

    #[test]
    fn load_boxes_keeps_box_order() {
        let first = MemoryBox::new("first").with_bead(&record("id_1"));
        let second = MemoryBox::new("second")
            .with_bead(&record("id_1"))
            .with_bead(&record("id_2"));
        let records = load_boxes(&[&first, &second]).unwrap();
        let found: Vec<(&str, &str)> = records
            .iter()
            .map(|r| (r.box_name(), r.content_id().as_str()))
            .collect();
        assert_eq!(found, [("first", "id_1"), ("second", "id_1"), ("second", "id_2")]);
    }

    #[test]
    fn no_boxes_no_beads() {
        assert!(load_boxes(&[]).unwrap().is_empty());
        assert!(MemoryBox::new("empty").is_empty());
    }
}
