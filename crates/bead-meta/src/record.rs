//! Bead records and their input references

use crate::content_id::ContentId;
use crate::name::BeadName;
use crate::time::FreezeTime;

/// Reference from a bead to one specific frozen input bead
///
/// `name` is the nick-name under which the consuming bead knows the input,
/// not necessarily the input bead's own name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct InputSpec {
    /// Nick-name local to the referencing bead
    pub name: String,
    /// Kind of the referenced bead
    pub kind: String,
    /// Content id of the referenced bead
    pub content_id: ContentId,
    /// Freeze time of the referenced bead
    pub freeze_time: FreezeTime,
}

impl InputSpec {
    /// Create an input reference
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<String>,
        content_id: ContentId,
        freeze_time: FreezeTime,
    ) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            content_id,
            freeze_time,
        }
    }

    /// Reference to `bead` under the nick-name `name`
    #[must_use]
    pub fn referencing(name: impl Into<String>, bead: &BeadRecord) -> Self {
        Self::new(
            name,
            bead.kind(),
            bead.content_id().clone(),
            bead.freeze_time().clone(),
        )
    }
}

/// One frozen bead version, as found in one box
///
/// # Invariants
/// - Immutable after construction
/// - `content_id` determines name, kind, freeze time and inputs; only
///   `box_name` may differ between records sharing a content id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeadRecord {
    name: BeadName,
    kind: String,
    box_name: String,
    content_id: ContentId,
    freeze_time: FreezeTime,
    inputs: Vec<InputSpec>,
}

impl BeadRecord {
    /// Create a record
    #[must_use]
    pub fn new(
        name: BeadName,
        kind: impl Into<String>,
        box_name: impl Into<String>,
        content_id: ContentId,
        freeze_time: FreezeTime,
        inputs: Vec<InputSpec>,
    ) -> Self {
        Self {
            name,
            kind: kind.into(),
            box_name: box_name.into(),
            content_id,
            freeze_time,
            inputs,
        }
    }

    /// Same bead found in another box
    #[must_use]
    pub fn relocated(&self, box_name: impl Into<String>) -> Self {
        Self {
            box_name: box_name.into(),
            ..self.clone()
        }
    }

    /// Name shared by all versions of the bead
    #[inline]
    #[must_use]
    pub fn name(&self) -> &BeadName {
        &self.name
    }

    /// Kind, stable across versions
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Box the record was found in (empty when unknown)
    #[inline]
    #[must_use]
    pub fn box_name(&self) -> &str {
        &self.box_name
    }

    /// Identity of the frozen content
    #[inline]
    #[must_use]
    pub fn content_id(&self) -> &ContentId {
        &self.content_id
    }

    /// When this version was frozen
    #[inline]
    #[must_use]
    pub fn freeze_time(&self) -> &FreezeTime {
        &self.freeze_time
    }

    /// Inputs in declaration order
    #[inline]
    #[must_use]
    pub fn inputs(&self) -> &[InputSpec] {
        &self.inputs
    }

    /// Input with nick-name `name`
    #[must_use]
    pub fn get_input(&self, name: &str) -> Option<&InputSpec> {
        self.inputs.iter().find(|input| input.name == name)
    }

    /// Whether both records describe the same content, ignoring location
    #[must_use]
    pub fn same_content_as(&self, other: &Self) -> bool {
        self.content_id == other.content_id
            && self.name == other.name
            && self.kind == other.kind
            && self.freeze_time == other.freeze_time
            && self.inputs == other.inputs
    }
}
