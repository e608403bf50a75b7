use std::fmt::Display;

use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::{
    automaton::{
        marking::Marking,
        petri_net::{PetriNet, TransitionIndex},
    },
    coverability::CoverabilityStatistics,
};

/// Processing state of a tree node. Every node starts out `Unprocessed` and
/// ends in exactly one of the other three tags once the builder is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeTag {
    Unprocessed,
    /// The marking equals the marking of a strict ancestor.
    Old,
    /// No transition is enabled under the marking.
    DeadEnd,
    Expanded,
}

impl NodeTag {
    pub fn label(&self) -> &'static str {
        match self {
            NodeTag::Unprocessed => "unprocessed",
            NodeTag::Old => "old",
            NodeTag::DeadEnd => "dead-end",
            NodeTag::Expanded => "expanded",
        }
    }
}

impl Display for NodeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub marking: Marking,
    pub tag: NodeTag,
    pub parent: Option<NodeIndex>,
    /// Children in the order their transitions were fired.
    pub children: Vec<NodeIndex>,
    /// The transition that produced this node from its parent.
    pub transition: Option<TransitionIndex>,
    pub depth: u64,
    /// For `Old` nodes, the ancestor holding the same marking.
    pub matched_ancestor: Option<NodeIndex>,
}

impl TreeNode {
    fn new(
        marking: Marking,
        parent: Option<NodeIndex>,
        transition: Option<TransitionIndex>,
        depth: u64,
    ) -> Self {
        TreeNode {
            marking,
            tag: NodeTag::Unprocessed,
            parent,
            children: vec![],
            transition,
            depth,
            matched_ancestor: None,
        }
    }
}

/// A Karp-Miller coverability tree.
///
/// Nodes live in a petgraph graph that is only ever appended to, so a
/// `NodeIndex` stays valid for the lifetime of the tree. Every edge points
/// from a parent to a child and is weighted with the fired transition.
#[derive(Debug, Clone)]
pub struct CoverabilityTree {
    graph: DiGraph<TreeNode, TransitionIndex>,
    root: NodeIndex,
    statistics: CoverabilityStatistics,
}

impl CoverabilityTree {
    pub fn new(initial_marking: Marking) -> Self {
        let mut graph = DiGraph::new();
        let root = graph.add_node(TreeNode::new(initial_marking, None, None, 0));

        CoverabilityTree {
            graph,
            root,
            statistics: CoverabilityStatistics::default(),
        }
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    pub fn node(&self, node: NodeIndex) -> &TreeNode {
        &self.graph[node]
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn graph(&self) -> &DiGraph<TreeNode, TransitionIndex> {
        &self.graph
    }

    pub fn statistics(&self) -> &CoverabilityStatistics {
        &self.statistics
    }

    /// All nodes in creation order.
    pub fn iter_nodes(&self) -> impl Iterator<Item = (NodeIndex, &TreeNode)> {
        self.graph
            .node_indices()
            .map(move |index| (index, &self.graph[index]))
    }

    pub fn children(&self, node: NodeIndex) -> &[NodeIndex] {
        &self.graph[node].children
    }

    /// `node` followed by its ancestors up to and including the root.
    pub fn path_to_root(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        std::iter::successors(Some(node), move |n| self.graph[*n].parent)
    }

    /// Ancestors of `node`, closest first, excluding `node` itself.
    pub fn strict_ancestors(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.path_to_root(node).skip(1)
    }

    pub fn nodes_with_tag(&self, tag: NodeTag) -> impl Iterator<Item = NodeIndex> + '_ {
        self.iter_nodes()
            .filter(move |(_, n)| n.tag == tag)
            .map(|(index, _)| index)
    }

    pub(crate) fn add_child(
        &mut self,
        parent: NodeIndex,
        marking: Marking,
        transition: TransitionIndex,
    ) -> NodeIndex {
        let depth = self.graph[parent].depth + 1;
        let child = self
            .graph
            .add_node(TreeNode::new(marking, Some(parent), Some(transition), depth));
        self.graph.add_edge(parent, child, transition);
        self.graph[parent].children.push(child);
        child
    }

    pub(crate) fn set_tag(&mut self, node: NodeIndex, tag: NodeTag) {
        debug_assert_eq!(
            self.graph[node].tag,
            NodeTag::Unprocessed,
            "Nodes are tagged exactly once"
        );
        self.graph[node].tag = tag;
    }

    pub(crate) fn mark_old(&mut self, node: NodeIndex, ancestor: NodeIndex) {
        self.set_tag(node, NodeTag::Old);
        self.graph[node].matched_ancestor = Some(ancestor);
    }

    pub(crate) fn set_statistics(&mut self, statistics: CoverabilityStatistics) {
        self.statistics = statistics;
    }

    /// A flat, name-resolved copy of the tree for serialization.
    pub fn to_serializable(&self, net: &PetriNet) -> SerializableCoverabilityTree {
        let nodes = self
            .iter_nodes()
            .map(|(index, node)| SerializableTreeNode {
                id: index.index(),
                parent: node.parent.map(|p| p.index()),
                transition: node
                    .transition
                    .map(|t| net.transition(t).name().to_string()),
                marking: node.marking.clone(),
                tag: node.tag,
                depth: node.depth,
                children: node.children.iter().map(|c| c.index()).collect(),
                matched_ancestor: node.matched_ancestor.map(|a| a.index()),
            })
            .collect();

        SerializableCoverabilityTree {
            places: net.places().to_vec(),
            root: self.root.index(),
            nodes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableTreeNode {
    pub id: usize,
    pub parent: Option<usize>,
    pub transition: Option<String>,
    pub marking: Marking,
    pub tag: NodeTag,
    pub depth: u64,
    pub children: Vec<usize>,
    pub matched_ancestor: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableCoverabilityTree {
    pub places: Vec<String>,
    pub root: usize,
    pub nodes: Vec<SerializableTreeNode>,
}
