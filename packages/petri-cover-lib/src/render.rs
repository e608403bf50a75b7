use itertools::Itertools;
use petgraph::{graph::NodeIndex, visit::EdgeRef};

use crate::{
    automaton::petri_net::PetriNet,
    coverability::tree::{CoverabilityTree, NodeTag},
};

/// Indented outline of the tree, one node per line, children in firing
/// order.
///
/// ```text
/// Node 0: [1, 0]
///   Node 1: [1, ω]  (← t1 from Node 0)
///     Node 2: [1, ω]  (← t1 from Node 1) [old]
/// ```
pub fn to_text(tree: &CoverabilityTree, net: &PetriNet) -> String {
    let mut lines = vec![];
    // explicit stack so deep trees do not overflow the call stack
    let mut stack = vec![(tree.root(), 0usize)];

    while let Some((index, level)) = stack.pop() {
        let node = tree.node(index);
        let mut line = format!(
            "{}Node {}: {}",
            "  ".repeat(level),
            index.index(),
            node.marking
        );

        if let (Some(parent), Some(transition)) = (node.parent, node.transition) {
            line.push_str(&format!(
                "  (← {} from Node {})",
                net.transition(transition).name(),
                parent.index()
            ));
        }

        match node.tag {
            NodeTag::Old | NodeTag::DeadEnd | NodeTag::Unprocessed => {
                line.push_str(&format!(" [{}]", node.tag));
            }
            NodeTag::Expanded => {}
        }

        lines.push(line);

        for child in node.children.iter().rev() {
            stack.push((*child, level + 1));
        }
    }

    lines.join("\n")
}

fn node_attributes(tree: &CoverabilityTree, index: NodeIndex) -> String {
    let node = tree.node(index);
    let mut attrs = vec![("label", format!("\"{}: {}\"", index.index(), node.marking))];

    match node.tag {
        NodeTag::Old => attrs.push(("style", "dashed".to_string())),
        NodeTag::DeadEnd => attrs.push(("shape", "doubleoctagon".to_string())),
        NodeTag::Unprocessed => attrs.push(("color", "gray".to_string())),
        NodeTag::Expanded => {}
    }

    attrs.iter().map(|(k, v)| format!("{}={}", k, v)).join(" ")
}

pub fn to_graphviz(tree: &CoverabilityTree, net: &PetriNet) -> String {
    let mut dot = String::new();
    dot.push_str("digraph coverability_tree {\n");
    dot.push_str("fontname=\"Helvetica,Arial,sans-serif\"\n");
    dot.push_str("node [fontname=\"Helvetica,Arial,sans-serif\" shape=box]\n");
    dot.push_str("edge [fontname=\"Helvetica,Arial,sans-serif\"]\n");

    for (index, _) in tree.iter_nodes() {
        dot.push_str(&format!(
            "{} [ {} ];\n",
            index.index(),
            node_attributes(tree, index)
        ));
    }

    for edge in tree.graph().edge_references() {
        dot.push_str(&format!(
            "{} -> {} [ label=\"{}\" ];\n",
            edge.source().index(),
            edge.target().index(),
            net.transition(*edge.weight()).name()
        ));
    }

    for (index, node) in tree.iter_nodes() {
        if let Some(ancestor) = node.matched_ancestor {
            dot.push_str(&format!(
                "{} -> {} [ style=dotted arrowhead=empty constraint=false ];\n",
                index.index(),
                ancestor.index()
            ));
        }
    }

    dot.push_str("}\n");

    dot
}
