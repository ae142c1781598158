//! Reference graph between beads
//!
//! Every logical bead of a [`BeadCollection`] becomes a node. Every input it
//! declares becomes an edge to the node with the referenced content id, or to
//! a [`Phantom`] when no such bead is known. One phantom node stands for
//! each distinct missing content id.
//!
//! Well-formed data is acyclic. Cycles are still represented as they are:
//! construction is a single pass over the inputs and never follows edges.

use crate::collection::BeadCollection;
use bead_meta::{BeadName, ContentId, FreezeTime, InputSpec};
use chrono::{DateTime, FixedOffset};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeMap, HashMap};

/// Placeholder for a referenced bead that is not in the collection
///
/// Everything known about it comes from the first [`InputSpec`] referring
/// to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phantom {
    pub name: String,
    pub kind: String,
    pub content_id: ContentId,
    pub freeze_time: FreezeTime,
}

impl Phantom {
    fn from_input(input: &InputSpec) -> Self {
        Self {
            name: input.name.clone(),
            kind: input.kind.clone(),
            content_id: input.content_id.clone(),
            freeze_time: input.freeze_time.clone(),
        }
    }
}

/// Graph node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Bead {
        content_id: ContentId,
        name: BeadName,
        freeze_time: FreezeTime,
    },
    Phantom(Phantom),
}

impl Node {
    #[must_use]
    pub fn content_id(&self) -> &ContentId {
        match self {
            Self::Bead { content_id, .. } => content_id,
            Self::Phantom(p) => &p.content_id,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_phantom(&self) -> bool {
        matches!(self, Self::Phantom(_))
    }
}

/// Edge from a consuming bead to one of its inputs, labelled by nick-name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEdge {
    pub nick: String,
}

/// Directed consumer → input graph over a bead collection
#[derive(Debug, Clone)]
pub struct BeadGraph {
    graph: DiGraph<Node, InputEdge>,
    index: HashMap<ContentId, NodeIndex>,
    beads: Vec<NodeIndex>,
    history: BTreeMap<BeadName, Vec<NodeIndex>>,
}

impl BeadGraph {
    /// Build the graph for `collection`
    #[must_use]
    pub fn build(collection: &BeadCollection) -> Self {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();
        let mut beads = Vec::with_capacity(collection.len());
        let mut history: BTreeMap<BeadName, Vec<NodeIndex>> = BTreeMap::new();

        for bead in collection.iter() {
            let record = bead.record();
            let node = graph.add_node(Node::Bead {
                content_id: record.content_id().clone(),
                name: record.name().clone(),
                freeze_time: record.freeze_time().clone(),
            });
            index.insert(record.content_id().clone(), node);
            beads.push(node);
            history.entry(record.name().clone()).or_default().push(node);
        }

        let mut phantoms = 0usize;
        for (bead, &from) in collection.iter().zip(&beads) {
            for input in bead.record().inputs() {
                let to = *index.entry(input.content_id.clone()).or_insert_with(|| {
                    phantoms += 1;
                    graph.add_node(Node::Phantom(Phantom::from_input(input)))
                });
                graph.add_edge(
                    from,
                    to,
                    InputEdge {
                        nick: input.name.clone(),
                    },
                );
            }
        }

        for versions in history.values_mut() {
            versions.sort_by(|a, b| version_key(&graph[*a]).cmp(&version_key(&graph[*b])));
        }

        tracing::debug!(
            beads = beads.len(),
            phantoms,
            edges = graph.edge_count(),
            names = history.len(),
            "built bead graph"
        );

        Self {
            graph,
            index,
            beads,
            history,
        }
    }

    /// Node for a content id (bead or phantom)
    #[must_use]
    pub fn node_index(&self, content_id: &str) -> Option<NodeIndex> {
        self.index.get(content_id).copied()
    }

    #[must_use]
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.graph[index]
    }

    /// Bead nodes in collection order
    #[inline]
    #[must_use]
    pub fn bead_nodes(&self) -> &[NodeIndex] {
        &self.beads
    }

    /// Phantom nodes
    pub fn phantoms(&self) -> impl Iterator<Item = &Phantom> {
        self.graph.node_weights().filter_map(|node| match node {
            Node::Phantom(p) => Some(p),
            Node::Bead { .. } => None,
        })
    }

    /// Direct inputs of a node (unordered)
    pub fn inputs(&self, node: NodeIndex) -> impl Iterator<Item = (NodeIndex, &InputEdge)> {
        self.graph
            .edges_directed(node, Direction::Outgoing)
            .map(|edge| (edge.target(), edge.weight()))
    }

    /// Nodes consuming `node` (unordered)
    pub fn consumers(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(node, Direction::Incoming)
    }

    /// Versions of `name`, oldest first
    #[must_use]
    pub fn history(&self, name: &BeadName) -> &[NodeIndex] {
        self.history.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Names of all non-phantom beads, sorted
    pub fn names(&self) -> impl Iterator<Item = &BeadName> {
        self.history.keys()
    }

    /// Newest version of `name`
    ///
    /// The maximum by freeze time; equal freeze times are decided by the
    /// larger content id.
    #[must_use]
    pub fn newest(&self, name: &BeadName) -> Option<NodeIndex> {
        self.history(name).last().copied()
    }

    /// Whether `node` is a bead and the newest version of its name
    #[must_use]
    pub fn is_newest(&self, node: NodeIndex) -> bool {
        match &self.graph[node] {
            Node::Bead { name, .. } => self.newest(name) == Some(node),
            Node::Phantom(_) => false,
        }
    }

    /// Groups of beads referencing each other in a cycle
    ///
    /// Each group is sorted by content id; groups are sorted by their first
    /// member.
    #[must_use]
    pub fn cycles(&self) -> Vec<Vec<ContentId>> {
        let mut cycles: Vec<Vec<ContentId>> = petgraph::algo::kosaraju_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0]))
            .map(|scc| {
                let mut members: Vec<ContentId> = scc
                    .into_iter()
                    .map(|n| self.graph[n].content_id().clone())
                    .collect();
                members.sort();
                members
            })
            .collect();
        cycles.sort();
        cycles
    }

    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[inline]
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

/// Versions of a name order by freeze instant, ties broken by content id
fn version_key(node: &Node) -> (DateTime<FixedOffset>, &ContentId) {
    match node {
        Node::Bead {
            freeze_time,
            content_id,
            ..
        } => (freeze_time.instant(), content_id),
        Node::Phantom(p) => (p.freeze_time.instant(), &p.content_id),
    }
}
