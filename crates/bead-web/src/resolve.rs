//! Freshness resolution
//!
//! Classifies every bead of a [`BeadGraph`]:
//!
//! 1. A bead that is not the newest version of its name is `SUPERSEDED`,
//!    whatever its inputs look like.
//! 2. A newest bead is `UP_TO_DATE` when every direct input resolves to a
//!    bead that is itself `UP_TO_DATE`, and `OUT_OF_DATE` otherwise. Phantom
//!    inputs and inputs pinned to an older version count as stale.
//!
//! Evaluation is a depth-first walk over an explicit stack with per-node
//! marks, so deep graphs cannot exhaust the call stack and every node is
//! classified once. Meeting a node that is still in progress means the data
//! contains a reference cycle; that input counts as stale and the cycle is
//! reported as an [`Anomaly`].

use crate::diagnostic::Anomaly;
use crate::freshness::Freshness;
use crate::graph::{BeadGraph, Node};
use bead_meta::ContentId;
use petgraph::graph::NodeIndex;
use std::collections::HashMap;

/// Freshness of every bead in a graph, plus anomalies met on the way
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    freshness: HashMap<ContentId, Freshness>,
    anomalies: Vec<Anomaly>,
}

impl Resolution {
    #[must_use]
    pub fn get(&self, content_id: &str) -> Option<Freshness> {
        self.freshness.get(content_id).copied()
    }

    #[inline]
    #[must_use]
    pub fn anomalies(&self) -> &[Anomaly] {
        &self.anomalies
    }

    /// Number of classified beads
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.freshness.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.freshness.is_empty()
    }

    /// Count of beads per freshness
    #[must_use]
    pub fn counts(&self) -> [(Freshness, usize); 3] {
        Freshness::ALL.map(|f| (f, self.freshness.values().filter(|v| **v == f).count()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done(Freshness),
}

struct Frame {
    node: NodeIndex,
    inputs: Vec<NodeIndex>,
    next: usize,
    stale: bool,
}

impl Frame {
    fn new(graph: &BeadGraph, node: NodeIndex) -> Self {
        Self {
            node,
            inputs: graph.inputs(node).map(|(target, _)| target).collect(),
            next: 0,
            stale: false,
        }
    }
}

/// Classify every bead of `graph`
#[must_use]
pub fn resolve(graph: &BeadGraph) -> Resolution {
    let mut marks = vec![Mark::Unvisited; graph.node_count()];

    for &node in graph.bead_nodes() {
        if !graph.is_newest(node) {
            marks[node.index()] = Mark::Done(Freshness::Superseded);
        }
    }

    let mut cycle_hits = 0usize;
    for &start in graph.bead_nodes() {
        if marks[start.index()] == Mark::Unvisited {
            cycle_hits += evaluate(graph, start, &mut marks);
        }
    }

    let freshness = graph
        .bead_nodes()
        .iter()
        .filter_map(|&node| match marks[node.index()] {
            Mark::Done(f) => Some((graph.node(node).content_id().clone(), f)),
            Mark::Unvisited | Mark::InProgress => None,
        })
        .collect();

    let anomalies: Vec<Anomaly> = graph
        .cycles()
        .into_iter()
        .map(|members| Anomaly::ReferenceCycle { members })
        .collect();
    for anomaly in &anomalies {
        tracing::warn!("{anomaly}");
    }

    let resolution = Resolution {
        freshness,
        anomalies,
    };
    let [(_, up_to_date), (_, out_of_date), (_, superseded)] = resolution.counts();
    tracing::debug!(
        up_to_date,
        out_of_date,
        superseded,
        cycle_hits,
        "resolved freshness"
    );
    resolution
}

/// Classify `start` and everything it depends on; returns cycle hits
fn evaluate(graph: &BeadGraph, start: NodeIndex, marks: &mut [Mark]) -> usize {
    let mut cycle_hits = 0;
    marks[start.index()] = Mark::InProgress;
    let mut stack = vec![Frame::new(graph, start)];

    while let Some(frame) = stack.last_mut() {
        if let Some(&target) = frame.inputs.get(frame.next) {
            frame.next += 1;
            if matches!(graph.node(target), Node::Phantom(_)) {
                frame.stale = true;
                continue;
            }
            match marks[target.index()] {
                Mark::Done(f) => frame.stale |= !f.is_up_to_date(),
                Mark::InProgress => {
                    frame.stale = true;
                    cycle_hits += 1;
                }
                Mark::Unvisited => {
                    marks[target.index()] = Mark::InProgress;
                    stack.push(Frame::new(graph, target));
                }
            }
        } else {
            let freshness = if frame.stale {
                Freshness::OutOfDate
            } else {
                Freshness::UpToDate
            };
            marks[frame.node.index()] = Mark::Done(freshness);
            stack.pop();
            if let Some(parent) = stack.last_mut() {
                parent.stale |= !freshness.is_up_to_date();
            }
        }
    }
    cycle_hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::BeadCollection;
    use bead_meta::{BeadName, BeadRecord, FreezeTime, InputSpec};

    const OLD: &str = "20180321T191922693711+0100";
    const NEW: &str = "20190321T191922693711+0100";

    fn record(name: &str, id: &str, time: &str, inputs: &[(&str, &str)]) -> BeadRecord {
        BeadRecord::new(
            BeadName::new(name),
            "k",
            "box",
            ContentId::new(id),
            FreezeTime::parse(time).unwrap(),
            inputs
                .iter()
                .map(|(nick, input)| {
                    InputSpec::new(*nick, "k", ContentId::new(*input), FreezeTime::parse(OLD).unwrap())
                })
                .collect(),
        )
    }

    fn resolve_records(records: Vec<BeadRecord>) -> Resolution {
        let collection = BeadCollection::from_records(records);
        resolve(&BeadGraph::build(&collection))
    }

    #[test]
    fn lone_bead_is_up_to_date() {
        let r = resolve_records(vec![record("a", "id_a", NEW, &[])]);
        assert_eq!(r.get("id_a"), Some(Freshness::UpToDate));
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn older_version_is_superseded_even_with_fresh_inputs() {
        let r = resolve_records(vec![
            record("root", "id_root", NEW, &[]),
            record("a", "id_a_old", OLD, &[("root", "id_root")]),
            record("a", "id_a_new", NEW, &[]),
        ]);
        assert_eq!(r.get("id_a_old"), Some(Freshness::Superseded));
        assert_eq!(r.get("id_a_new"), Some(Freshness::UpToDate));
    }

    #[test]
    fn input_pinned_to_old_version_is_out_of_date() {
        let r = resolve_records(vec![
            record("root", "id_root_old", OLD, &[]),
            record("root", "id_root_new", NEW, &[]),
            record("a", "id_a", NEW, &[("root", "id_root_old")]),
        ]);
        assert_eq!(r.get("id_a"), Some(Freshness::OutOfDate));
    }

    #[test]
    fn staleness_propagates_transitively() {
        let r = resolve_records(vec![
            record("root", "id_root_old", OLD, &[]),
            record("root", "id_root_new", NEW, &[]),
            record("a", "id_a", NEW, &[("root", "id_root_old")]),
            record("b", "id_b", NEW, &[("a", "id_a")]),
            record("c", "id_c", NEW, &[("b", "id_b")]),
        ]);
        assert_eq!(r.get("id_b"), Some(Freshness::OutOfDate));
        assert_eq!(r.get("id_c"), Some(Freshness::OutOfDate));
    }

    #[test]
    fn phantom_input_is_out_of_date() {
        let r = resolve_records(vec![record("a", "id_a", NEW, &[("gone", "id_gone")])]);
        assert_eq!(r.get("id_a"), Some(Freshness::OutOfDate));
        assert_eq!(r.get("id_gone"), None);
    }

    #[test]
    fn fresh_chain_is_up_to_date() {
        let r = resolve_records(vec![
            record("c", "id_c", NEW, &[("b", "id_b")]),
            record("b", "id_b", NEW, &[("a", "id_a")]),
            record("a", "id_a", NEW, &[]),
        ]);
        for id in ["id_a", "id_b", "id_c"] {
            assert_eq!(r.get(id), Some(Freshness::UpToDate), "{id}");
        }
    }

    #[test]
    fn cycle_terminates_and_is_reported() {
        let r = resolve_records(vec![
            record("x", "id_x", NEW, &[("y", "id_y")]),
            record("y", "id_y", NEW, &[("x", "id_x")]),
            record("w", "id_w", NEW, &[("x", "id_x")]),
        ]);
        assert_eq!(r.get("id_x"), Some(Freshness::OutOfDate));
        assert_eq!(r.get("id_y"), Some(Freshness::OutOfDate));
        assert_eq!(r.get("id_w"), Some(Freshness::OutOfDate));
        assert_eq!(
            r.anomalies(),
            [Anomaly::ReferenceCycle {
                members: vec![ContentId::new("id_x"), ContentId::new("id_y")]
            }]
        );
    }

    #[test]
    fn self_reference_is_out_of_date() {
        let r = resolve_records(vec![record("z", "id_z", NEW, &[("z", "id_z")])]);
        assert_eq!(r.get("id_z"), Some(Freshness::OutOfDate));
        assert_eq!(r.anomalies().len(), 1);
    }

    #[test]
    fn deep_chain_does_not_overflow() {
        let depth = 50_000;
        let mut records = vec![record("n", "id_0", NEW, &[])];
        for i in 1..depth {
            let prev = format!("id_{}", i - 1);
            records.push(BeadRecord::new(
                BeadName::new(format!("n{i}")),
                "k",
                "box",
                ContentId::new(format!("id_{i}")),
                FreezeTime::parse(NEW).unwrap(),
                vec![InputSpec::new("prev", "k", ContentId::new(prev), FreezeTime::parse(NEW).unwrap())],
            ));
        }
        records.reverse();
        let r = resolve_records(records);
        assert_eq!(r.len(), depth);
        assert_eq!(r.get(&format!("id_{}", depth - 1)), Some(Freshness::UpToDate));
    }

    #[test]
    fn counts_cover_every_bead() {
        let r = resolve_records(vec![
            record("root", "id_root_old", OLD, &[]),
            record("root", "id_root_new", NEW, &[]),
            record("a", "id_a", NEW, &[("root", "id_root_old")]),
        ]);
        assert_eq!(
            r.counts(),
            [
                (Freshness::UpToDate, 1),
                (Freshness::OutOfDate, 1),
                (Freshness::Superseded, 1)
            ]
        );
    }
}
