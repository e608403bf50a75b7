#![allow(dead_code)]

use petri_cover_lib::{
    automaton::petri_net::initialized::InitializedPetriNet,
    config::CoverabilityConfig,
    coverability::{
        CoverabilityTreeBuilder,
        tree::{CoverabilityTree, NodeTag},
    },
};

pub fn net(text: &str) -> InitializedPetriNet {
    InitializedPetriNet::parse_from_text(text).unwrap()
}

pub fn build(net: &InitializedPetriNet) -> CoverabilityTree {
    build_with(net, CoverabilityConfig::default())
}

pub fn build_with(net: &InitializedPetriNet, config: CoverabilityConfig) -> CoverabilityTree {
    CoverabilityTreeBuilder::new(net, config)
        .unwrap()
        .build()
        .unwrap()
}

/// Checks the structural guarantees every finished tree has to satisfy.
pub fn assert_tree_invariants(tree: &CoverabilityTree, net: &InitializedPetriNet) {
    for (index, node) in tree.iter_nodes() {
        let enabled = net
            .net
            .enabled_transitions(&node.marking)
            .map(|(t, _)| t)
            .collect::<Vec<_>>();

        match node.tag {
            NodeTag::Unprocessed => panic!("node {} was never processed", index.index()),
            NodeTag::Old => {
                assert!(node.children.is_empty(), "old node {} has children", index.index());
                let equal = tree
                    .strict_ancestors(index)
                    .filter(|a| tree.node(*a).marking == node.marking)
                    .collect::<Vec<_>>();
                assert_eq!(equal.len(), 1, "old node {} must repeat exactly one ancestor", index.index());
                assert_eq!(node.matched_ancestor, Some(equal[0]));
            }
            NodeTag::DeadEnd => {
                assert!(enabled.is_empty());
                assert!(node.children.is_empty());
            }
            NodeTag::Expanded => {
                assert!(!enabled.is_empty());
                let fired = node
                    .children
                    .iter()
                    .map(|c| tree.node(*c).transition.unwrap())
                    .collect::<Vec<_>>();
                assert_eq!(fired, enabled, "children must follow declaration order");
            }
        }

        if let Some(parent) = node.parent {
            assert_eq!(node.depth, tree.node(parent).depth + 1);
            assert!(tree.children(parent).contains(&index));
        } else {
            assert_eq!(index, tree.root());
        }
    }
}
