//! Non-fatal findings about a bead collection
//!
//! Inconsistent data never stops a load or a resolution pass. It is reported
//! here instead, so callers can surface it next to the results.

use bead_meta::ContentId;
use std::fmt::{self, Display, Formatter};

/// Metadata that contradicts content addressing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityWarning {
    /// Same content id seen with different metadata; the first record was kept
    ConflictingMetadata {
        content_id: ContentId,
        kept_box: String,
        conflicting_box: String,
    },

    /// A bead declares two inputs under the same nick-name
    DuplicateInputName { content_id: ContentId, input: String },
}

/// Structural anomaly found while resolving freshness
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    /// Beads that reference each other in a cycle (sorted)
    ReferenceCycle { members: Vec<ContentId> },
}

/// Any finding surfaced by a [`Sketch`](crate::Sketch)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    Integrity(IntegrityWarning),
    Anomaly(Anomaly),
}

impl Diagnostic {
    #[inline]
    #[must_use]
    pub fn is_integrity_warning(&self) -> bool {
        matches!(self, Self::Integrity(_))
    }

    /// Content ids the finding is about
    #[must_use]
    pub fn content_ids(&self) -> Vec<&ContentId> {
        match self {
            Self::Integrity(
                IntegrityWarning::ConflictingMetadata { content_id, .. }
                | IntegrityWarning::DuplicateInputName { content_id, .. },
            ) => vec![content_id],
            Self::Anomaly(Anomaly::ReferenceCycle { members }) => members.iter().collect(),
        }
    }
}

impl From<IntegrityWarning> for Diagnostic {
    fn from(value: IntegrityWarning) -> Self {
        Self::Integrity(value)
    }
}

impl From<Anomaly> for Diagnostic {
    fn from(value: Anomaly) -> Self {
        Self::Anomaly(value)
    }
}

impl Display for IntegrityWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConflictingMetadata {
                content_id,
                kept_box,
                conflicting_box,
            } => write!(
                f,
                "content id {content_id} has conflicting metadata in box '{conflicting_box}', keeping the one from box '{kept_box}'"
            ),
            Self::DuplicateInputName { content_id, input } => {
                write!(f, "bead {content_id} declares input '{input}' more than once")
            }
        }
    }
}

impl Display for Anomaly {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReferenceCycle { members } => {
                let ids: Vec<&str> = members.iter().map(ContentId::as_str).collect();
                write!(f, "reference cycle between beads [{}]", ids.join(", "))
            }
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integrity(w) => write!(f, "integrity warning: {w}"),
            Self::Anomaly(a) => write!(f, "anomaly: {a}"),
        }
    }
}
