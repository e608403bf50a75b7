use hashbrown::HashSet;
use itertools::Itertools;
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

use crate::{
    automaton::{
        marking::{Marking, PlaceIndex},
        petri_net::PetriNet,
    },
    coverability::{
        CoverabilityStatistics,
        tree::{CoverabilityTree, NodeTag},
    },
};

/// A node whose marking repeats the marking of one of its ancestors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatedMarking {
    pub node: NodeIndex,
    pub ancestor: NodeIndex,
}

/// Properties of a net read off its finished coverability tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverabilityReport {
    /// Places that hold ω somewhere in the tree, in place order.
    pub unbounded_places: Vec<PlaceIndex>,
    pub dead_ends: Vec<NodeIndex>,
    pub repeated: Vec<RepeatedMarking>,
}

impl CoverabilityReport {
    pub fn new(tree: &CoverabilityTree) -> Self {
        let unbounded: HashSet<PlaceIndex> = tree
            .iter_nodes()
            .flat_map(|(_, node)| node.marking.omega_places())
            .collect();

        let repeated = tree
            .nodes_with_tag(NodeTag::Old)
            .filter_map(|node| {
                tree.node(node)
                    .matched_ancestor
                    .or_else(|| Self::find_equal_ancestor(tree, node))
                    .map(|ancestor| RepeatedMarking { node, ancestor })
            })
            .collect();

        CoverabilityReport {
            unbounded_places: unbounded.into_iter().sorted().collect(),
            dead_ends: tree.nodes_with_tag(NodeTag::DeadEnd).collect(),
            repeated,
        }
    }

    /// Repeats the equality search for trees whose old nodes carry no cached
    /// match.
    fn find_equal_ancestor(tree: &CoverabilityTree, node: NodeIndex) -> Option<NodeIndex> {
        let marking = &tree.node(node).marking;
        tree.strict_ancestors(node)
            .find(|ancestor| tree.node(*ancestor).marking == *marking)
    }

    pub fn is_bounded(&self) -> bool {
        self.unbounded_places.is_empty()
    }

    pub fn is_place_bounded(&self, place: PlaceIndex) -> bool {
        !self.unbounded_places.contains(&place)
    }

    pub fn has_dead_ends(&self) -> bool {
        !self.dead_ends.is_empty()
    }

    /// One line per property, in the order bounded-ness, dead ends, repeated
    /// markings. Each line starts with ✓ or ✗.
    pub fn summary_lines(&self, net: &PetriNet) -> Vec<String> {
        let mut lines = vec![];

        if self.is_bounded() {
            lines.push("✓ Network is BOUNDED (all places are bounded)".to_string());
        } else {
            lines.push(format!(
                "✗ Network is UNBOUNDED (unbounded places: {})",
                self.unbounded_places
                    .iter()
                    .map(|p| net.place_name(*p))
                    .join(", ")
            ));
        }

        if self.dead_ends.is_empty() {
            lines.push("✓ No dead-end nodes".to_string());
        } else {
            lines.push(format!("✗ Dead-end nodes found: {}", self.dead_ends.len()));
        }

        if self.repeated.is_empty() {
            lines.push("✓ No old nodes".to_string());
        } else {
            lines.push(format!("✓ Old nodes found: {}", self.repeated.len()));
        }

        lines
    }

    pub fn to_serializable(
        &self,
        tree: &CoverabilityTree,
        net: &PetriNet,
    ) -> SerializableCoverabilityReport {
        SerializableCoverabilityReport {
            bounded: self.is_bounded(),
            unbounded_places: self
                .unbounded_places
                .iter()
                .map(|p| net.place_name(*p).to_string())
                .collect(),
            dead_ends: self
                .dead_ends
                .iter()
                .map(|node| SerializableReportNode {
                    id: node.index(),
                    marking: tree.node(*node).marking.clone(),
                    ancestor: None,
                })
                .collect(),
            repeated: self
                .repeated
                .iter()
                .map(|r| SerializableReportNode {
                    id: r.node.index(),
                    marking: tree.node(r.node).marking.clone(),
                    ancestor: Some(r.ancestor.index()),
                })
                .collect(),
            statistics: tree.statistics().clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableReportNode {
    pub id: usize,
    pub marking: Marking,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ancestor: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableCoverabilityReport {
    pub bounded: bool,
    pub unbounded_places: Vec<String>,
    pub dead_ends: Vec<SerializableReportNode>,
    pub repeated: Vec<SerializableReportNode>,
    pub statistics: CoverabilityStatistics,
}
