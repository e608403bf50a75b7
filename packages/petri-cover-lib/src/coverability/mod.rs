use std::{collections::VecDeque, fmt::Display, ops::ControlFlow};

use itertools::Itertools;
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use tree::{CoverabilityTree, NodeTag};

use crate::{
    automaton::{
        marking::Marking,
        petri_net::{TransitionIndex, initialized::InitializedPetriNet},
    },
    config::{AccelerationStrategy, CoverabilityConfig},
    error::{CoverabilityError, CoverabilityResult},
};

pub mod tree;

/// A configured ceiling that stopped tree construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildLimit {
    MaxNodes(u64),
    MaxDepth(u64),
}

impl Display for BuildLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildLimit::MaxNodes(n) => write!(f, "node limit of {} exceeded", n),
            BuildLimit::MaxDepth(d) => write!(f, "depth limit of {} exceeded", d),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverabilityStatistics {
    pub node_count: u64,
    /// Number of nodes taken off the worklist.
    pub step_count: u64,
    pub acceleration_count: u64,
    pub max_depth: u64,
    pub time: std::time::Duration,
}

/// Builds the Karp-Miller coverability tree of an initialized Petri net.
///
/// Nodes are processed in creation order (FIFO worklist). For every node:
///
/// 1. If a strict ancestor holds an equal marking, the node is tagged `old`
///    and not expanded further.
/// 2. If no transition is enabled, the node is tagged `dead-end`.
/// 3. Otherwise it is tagged `expanded` and every enabled transition is
///    fired in declaration order. When a successor strictly dominates a
///    marking on the path from the node back to the root, the successor is
///    accelerated against that marking (see [`AccelerationStrategy`] for
///    which one is chosen) and every strictly increased place becomes ω.
///
/// Every infinite branch would eventually have to repeat a marking or add
/// a new ω, and a marking has finitely many places, so construction
/// always terminates.
pub struct CoverabilityTreeBuilder<'n> {
    net: &'n InitializedPetriNet,
    config: CoverabilityConfig,
    tree: CoverabilityTree,
    worklist: VecDeque<NodeIndex>,
    step_count: u64,
    acceleration_count: u64,
    start_time: Option<std::time::Instant>,
}

impl<'n> CoverabilityTreeBuilder<'n> {
    /// Validates the model. An inconsistent model is rejected here, before
    /// any node is created.
    pub fn new(net: &'n InitializedPetriNet, config: CoverabilityConfig) -> CoverabilityResult<Self> {
        net.validate()?;

        Ok(CoverabilityTreeBuilder {
            net,
            config,
            tree: CoverabilityTree::new(net.initial_marking.clone()),
            worklist: VecDeque::new(),
            step_count: 0,
            acceleration_count: 0,
            start_time: None,
        })
    }

    pub fn build(mut self) -> CoverabilityResult<CoverabilityTree> {
        self.start_time = Some(std::time::Instant::now());

        tracing::info!(
            "Building coverability tree: {} places, {} transitions, initial marking {}",
            self.net.place_count(),
            self.net.net.transitions().len(),
            self.net.initial_marking
        );

        if let Some(limit) = self.node_limit_exceeded(self.tree.node_count()) {
            return Err(self.exhausted(limit));
        }

        self.worklist.push_back(self.tree.root());

        while let Some(node) = self.worklist.pop_front() {
            self.step_count += 1;

            if let ControlFlow::Break(limit) = self.process(node)? {
                return Err(self.exhausted(limit));
            }
        }

        let tree = self.finish();
        tracing::info!(
            "Coverability tree finished with {} nodes in {:?}",
            tree.node_count(),
            tree.statistics().time
        );

        Ok(tree)
    }

    fn process(&mut self, node: NodeIndex) -> CoverabilityResult<ControlFlow<BuildLimit>> {
        if let Some(ancestor) = self.find_equal_ancestor(node) {
            tracing::trace!("Node {} repeats node {}", node.index(), ancestor.index());
            self.tree.mark_old(node, ancestor);
            return Ok(ControlFlow::Continue(()));
        }

        let marking = self.tree.node(node).marking.clone();
        let enabled = self
            .net
            .net
            .enabled_transitions(&marking)
            .map(|(index, _)| index)
            .collect_vec();

        if enabled.is_empty() {
            tracing::trace!("Node {} {} is a dead end", node.index(), marking);
            self.tree.set_tag(node, NodeTag::DeadEnd);
            return Ok(ControlFlow::Continue(()));
        }

        self.tree.set_tag(node, NodeTag::Expanded);

        for transition in enabled {
            let successor = self.successor(node, &marking, transition)?;

            let child_depth = self.tree.node(node).depth + 1;
            if let Some(limit) = self
                .node_limit_exceeded(self.tree.node_count() + 1)
                .or_else(|| self.depth_limit_exceeded(child_depth))
            {
                return Ok(ControlFlow::Break(limit));
            }

            let child = self.tree.add_child(node, successor, transition);
            self.worklist.push_back(child);
        }

        Ok(ControlFlow::Continue(()))
    }

    /// Fires `transition` under `marking` and accelerates the result if it
    /// dominates a marking on the path from `node` to the root.
    fn successor(
        &mut self,
        node: NodeIndex,
        marking: &Marking,
        transition: TransitionIndex,
    ) -> CoverabilityResult<Marking> {
        let fired = self.net.net.transition(transition).fire(marking)?;

        let Some(ancestor) = self.find_dominated_ancestor(node, &fired) else {
            return Ok(fired);
        };

        let accelerated = fired.accelerate(&self.tree.node(ancestor).marking);
        self.acceleration_count += 1;

        tracing::debug!(
            "Accelerated {} against node {} {}: ω at [{}]",
            fired,
            ancestor.index(),
            self.tree.node(ancestor).marking,
            accelerated
                .new_omega_places(&fired)
                .map(|p| self.net.net.place_name(p))
                .join(", ")
        );

        Ok(accelerated)
    }

    /// The strict ancestor of `node` whose marking equals `node`'s marking.
    /// There is at most one, since an equal marking would already have
    /// stopped the branch at the higher of two repeats.
    fn find_equal_ancestor(&self, node: NodeIndex) -> Option<NodeIndex> {
        let marking = &self.tree.node(node).marking;
        self.tree
            .strict_ancestors(node)
            .find(|ancestor| self.tree.node(*ancestor).marking == *marking)
    }

    /// A node on the path from `node` (inclusive) to the root whose marking
    /// is strictly dominated by `successor`.
    fn find_dominated_ancestor(&self, node: NodeIndex, successor: &Marking) -> Option<NodeIndex> {
        let mut candidates = self
            .tree
            .path_to_root(node)
            .filter(|ancestor| successor.dominates(&self.tree.node(*ancestor).marking));

        match self.config.get_acceleration() {
            AccelerationStrategy::ClosestAncestor => candidates.next(),
            AccelerationStrategy::FarthestAncestor => candidates.last(),
        }
    }

    fn node_limit_exceeded(&self, node_count: usize) -> Option<BuildLimit> {
        let max = (*self.config.get_max_nodes())?;
        (node_count as u64 > max).then_some(BuildLimit::MaxNodes(max))
    }

    fn depth_limit_exceeded(&self, depth: u64) -> Option<BuildLimit> {
        let max = (*self.config.get_max_depth())?;
        (depth > max).then_some(BuildLimit::MaxDepth(max))
    }

    fn exhausted(self, limit: BuildLimit) -> CoverabilityError {
        tracing::warn!("Stopping coverability tree construction: {}", limit);

        CoverabilityError::ResourceExhausted {
            limit,
            tree: Box::new(self.finish()),
        }
    }

    fn finish(mut self) -> CoverabilityTree {
        let statistics = CoverabilityStatistics {
            node_count: self.tree.node_count() as u64,
            step_count: self.step_count,
            acceleration_count: self.acceleration_count,
            max_depth: self
                .tree
                .iter_nodes()
                .map(|(_, n)| n.depth)
                .max()
                .unwrap_or_default(),
            time: self
                .start_time
                .map(|start| start.elapsed())
                .unwrap_or_default(),
        };

        self.tree.set_statistics(statistics);
        self.tree
    }
}
