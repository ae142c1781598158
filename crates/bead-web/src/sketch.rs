//! Sketch: the resolved, queryable view of a bead collection
//!
//! A [`Sketch`] owns the loaded records, the reference graph built over them
//! and the freshness of every bead. It is immutable; a changed collection
//! means building a new sketch.

use crate::collection::BeadCollection;
use crate::diagnostic::Diagnostic;
use crate::freshness::Freshness;
use crate::graph::{BeadGraph, Node, Phantom};
use crate::resolve::{resolve, Resolution};
use crate::snapshot::SnapshotBead;
use bead_meta::{BeadName, BeadRecord, ContentId};
use chrono::{DateTime, FixedOffset};

/// Where one input of a bead resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedInput<'a> {
    /// Input bead is in the sketch
    Bead {
        nick: &'a str,
        bead: &'a BeadRecord,
        freshness: Freshness,
    },
    /// Input bead is unknown
    Phantom { nick: &'a str, phantom: &'a Phantom },
}

impl ResolvedInput<'_> {
    /// Nick-name of the input on the consuming bead
    #[must_use]
    pub fn nick(&self) -> &str {
        match self {
            Self::Bead { nick, .. } | Self::Phantom { nick, .. } => nick,
        }
    }

    /// Whether this input keeps its consumer up to date
    #[must_use]
    pub fn is_up_to_date(&self) -> bool {
        matches!(
            self,
            Self::Bead {
                freshness: Freshness::UpToDate,
                ..
            }
        )
    }
}

/// Resolved bead collection
#[derive(Debug, Clone)]
pub struct Sketch {
    collection: BeadCollection,
    graph: BeadGraph,
    resolution: Resolution,
}

impl Sketch {
    /// Build a sketch from records in load order
    #[must_use]
    pub fn from_beads(records: impl IntoIterator<Item = BeadRecord>) -> Self {
        let collection = BeadCollection::from_records(records);
        let graph = BeadGraph::build(&collection);
        let resolution = resolve(&graph);
        Self {
            collection,
            graph,
            resolution,
        }
    }

    /// Build a sketch from snapshot entries, recomputing their freshness
    #[must_use]
    pub fn from_snapshot(entries: impl IntoIterator<Item = SnapshotBead>) -> Self {
        Self::from_beads(entries.into_iter().map(|entry| entry.bead))
    }

    /// Snapshot entries in load order, tagged with resolved freshness
    #[must_use]
    pub fn to_snapshot(&self) -> Vec<SnapshotBead> {
        self.beads()
            .map(|(bead, freshness)| SnapshotBead::new(bead.clone(), Some(freshness)))
            .collect()
    }

    /// Every loaded record with its freshness, in load order
    ///
    /// A bead found in several boxes appears once per box.
    pub fn beads(&self) -> impl Iterator<Item = (&BeadRecord, Freshness)> {
        self.collection.origins().iter().filter_map(|bead| {
            self.resolution
                .get(bead.content_id().as_str())
                .map(|freshness| (bead, freshness))
        })
    }

    /// Records with the given freshness, in load order
    #[must_use]
    pub fn with_freshness(&self, freshness: Freshness) -> Vec<&BeadRecord> {
        self.beads()
            .filter(|(_, f)| *f == freshness)
            .map(|(bead, _)| bead)
            .collect()
    }

    /// Bead with `content_id` (the first record loaded for it)
    #[must_use]
    pub fn get(&self, content_id: &str) -> Option<&BeadRecord> {
        self.collection.get(content_id).map(|b| b.record())
    }

    #[must_use]
    pub fn freshness(&self, content_id: &str) -> Option<Freshness> {
        self.resolution.get(content_id)
    }

    /// Boxes in which `content_id` was found
    #[must_use]
    pub fn locations(&self, content_id: &str) -> &[String] {
        self.collection
            .get(content_id)
            .map(|b| b.locations())
            .unwrap_or_default()
    }

    /// Versions of `name`, oldest first
    #[must_use]
    pub fn history(&self, name: &str) -> Vec<&BeadRecord> {
        self.graph
            .history(&BeadName::new(name))
            .iter()
            .filter_map(|&node| self.get(self.graph.node(node).content_id().as_str()))
            .collect()
    }

    /// Newest version of `name`
    #[must_use]
    pub fn newest(&self, name: &str) -> Option<&BeadRecord> {
        self.history(name).pop()
    }

    /// Newest version of `name` frozen at or before `time`
    #[must_use]
    pub fn at_time(&self, name: &str, time: DateTime<FixedOffset>) -> Option<&BeadRecord> {
        self.history(name)
            .into_iter()
            .rev()
            .find(|bead| bead.freeze_time().instant() <= time)
    }

    /// Names of all beads, sorted
    pub fn names(&self) -> impl Iterator<Item = &BeadName> {
        self.graph.names()
    }

    /// Inputs of `content_id` in declaration order
    #[must_use]
    pub fn inputs_of(&self, content_id: &str) -> Vec<ResolvedInput<'_>> {
        let Some(bead) = self.get(content_id) else {
            return Vec::new();
        };
        bead.inputs()
            .iter()
            .filter_map(|input| {
                let node = self.graph.node_index(input.content_id.as_str())?;
                Some(match self.graph.node(node) {
                    Node::Phantom(phantom) => ResolvedInput::Phantom {
                        nick: &input.name,
                        phantom,
                    },
                    Node::Bead { content_id, .. } => ResolvedInput::Bead {
                        nick: &input.name,
                        bead: self.get(content_id.as_str())?,
                        freshness: self.freshness(content_id.as_str())?,
                    },
                })
            })
            .collect()
    }

    /// Referenced beads missing from the sketch
    pub fn phantoms(&self) -> impl Iterator<Item = &Phantom> {
        self.graph.phantoms()
    }

    /// Beads that reference `content_id` directly
    #[must_use]
    pub fn consumers_of(&self, content_id: &str) -> Vec<&BeadRecord> {
        let Some(node) = self.graph.node_index(content_id) else {
            return Vec::new();
        };
        let mut consumers: Vec<&BeadRecord> = self
            .graph
            .consumers(node)
            .filter_map(|n| self.get(self.graph.node(n).content_id().as_str()))
            .collect();
        consumers.sort_by(|a, b| a.content_id().cmp(b.content_id()));
        consumers.dedup_by(|a, b| a.content_id() == b.content_id());
        consumers
    }

    /// Loader warnings followed by resolver anomalies
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.collection
            .diagnostics()
            .iter()
            .cloned()
            .chain(self.resolution.anomalies().iter().cloned().map(Diagnostic::from))
            .collect()
    }

    /// Count of beads per freshness
    #[must_use]
    pub fn counts(&self) -> [(Freshness, usize); 3] {
        self.resolution.counts()
    }

    /// Number of distinct beads
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.collection.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn graph(&self) -> &BeadGraph {
        &self.graph
    }

    /// Content ids of all beads, in first-seen order
    pub fn content_ids(&self) -> impl Iterator<Item = &ContentId> {
        self.collection.iter().map(|b| b.record().content_id())
    }
}

impl PartialEq for Sketch {
    fn eq(&self, other: &Self) -> bool {
        self.collection == other.collection && self.resolution == other.resolution
    }
}

impl Eq for Sketch {}
