mod common;

use common::{build, net};
use petri_cover_lib::{analysis::CoverabilityReport, render};

const THREE_CYCLE: &str = r#"
    places: P0, P1, P2
    marking: 1, 0, 0
    transitions: t1: P0=1 -> P1=1, t2: P1=1 -> P2=1, t3: P2=1 -> P0=1
"#;

const GROWTH: &str = r#"
    places: P0, P1
    marking: 1, 0
    transitions: t1: P0=1 -> P0=1;P1=1, stop: P0=1 ->
"#;

#[test]
fn text_outline_of_cycle() {
    let net = net(THREE_CYCLE);
    let tree = build(&net);

    let expected = [
        "Node 0: [1, 0, 0]",
        "  Node 1: [0, 1, 0]  (← t1 from Node 0)",
        "    Node 2: [0, 0, 1]  (← t2 from Node 1)",
        "      Node 3: [1, 0, 0]  (← t3 from Node 2) [old]",
    ]
    .join("\n");
    assert_eq!(render::to_text(&tree, &net.net), expected);
}

#[test]
fn text_outline_lists_children_in_firing_order() {
    let net = net(GROWTH);
    let tree = build(&net);
    let text = render::to_text(&tree, &net.net);
    let lines = text.lines().collect::<Vec<_>>();

    // [1,0] -t1-> [1,ω] -t1-> [1,ω] (old)
    //                   -stop-> [0,ω] (dead end)
    //       -stop-> [0,0] (dead end)
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "Node 0: [1, 0]");
    assert!(lines[1].starts_with("  Node 1: [1, ω]"));
    assert!(lines[2].ends_with("[old]"));
    assert!(lines[3].ends_with("[dead-end]"));
    assert!(lines[4].starts_with("  Node 2: [0, 0]"));
}

#[test]
fn summary_of_bounded_net() {
    let net = net(THREE_CYCLE);
    let tree = build(&net);
    let lines = CoverabilityReport::new(&tree).summary_lines(&net.net);

    assert_eq!(
        lines,
        vec![
            "✓ Network is BOUNDED (all places are bounded)",
            "✓ No dead-end nodes",
            "✓ Old nodes found: 1",
        ]
    );
}

#[test]
fn summary_of_unbounded_net() {
    let net = net(GROWTH);
    let tree = build(&net);
    let report = CoverabilityReport::new(&tree);
    let lines = report.summary_lines(&net.net);

    assert_eq!(lines[0], "✗ Network is UNBOUNDED (unbounded places: P1)");
    assert_eq!(lines[1], "✗ Dead-end nodes found: 2");

    let serializable = report.to_serializable(&tree, &net.net);
    assert!(!serializable.bounded);
    assert_eq!(serializable.unbounded_places, vec!["P1".to_string()]);
    assert_eq!(serializable.repeated.len(), 1);
    assert_eq!(serializable.repeated[0].ancestor, Some(1));
    assert_eq!(serializable.statistics.node_count, 5);
}

#[test]
fn graphviz_output() {
    let net = net(GROWTH);
    let tree = build(&net);
    let dot = render::to_graphviz(&tree, &net.net);

    assert!(dot.starts_with("digraph coverability_tree {"));
    assert!(dot.contains("0 -> 1 [ label=\"t1\" ];"));
    assert!(dot.contains("0 -> 2 [ label=\"stop\" ];"));
    assert!(dot.contains("shape=doubleoctagon"));
    assert!(dot.contains("style=dashed"));
    // back edge from the old node to the ancestor it repeats
    assert!(dot.contains("3 -> 1 [ style=dotted"));
    assert!(dot.trim_end().ends_with('}'));
}

#[test]
fn serialized_tree_names_transitions() {
    let net = net(THREE_CYCLE);
    let tree = build(&net);
    let serializable = tree.to_serializable(&net.net);

    assert_eq!(serializable.nodes.len(), 4);
    assert_eq!(serializable.nodes[0].transition, None);
    assert_eq!(serializable.nodes[3].transition.as_deref(), Some("t3"));

    let json = serde_json::to_string(&serializable).unwrap();
    assert!(json.contains("\"old\""));
}
