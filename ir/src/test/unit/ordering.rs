use crate::Graph;
use crate::test::helpers::*;

#[test]
fn test_topological_order_diamond() {
    let mut graph = Graph::new("diamond");
    let sink = add_op(&mut graph, "sink", "Add", &["l", "r"], &["y"]);
    let left = add_op(&mut graph, "left", "Relu", &["h"], &["l"]);
    let right = add_op(&mut graph, "right", "Relu", &["h"], &["r"]);
    let source = add_op(&mut graph, "source", "Relu", &["x"], &["h"]);
    // Nodes were added consumers-first, so wire the edges now that producers exist.
    graph.add_edge(left, sink, 0, 0).unwrap();
    graph.add_edge(right, sink, 0, 1).unwrap();
    graph.add_edge(source, left, 0, 0).unwrap();
    graph.add_edge(source, right, 0, 0).unwrap();

    assert_eq!(graph.topological_order(), vec![source, left, right, sink]);
}

#[test]
fn test_topological_order_skips_removed() {
    let (mut graph, first, second) = relu_chain();
    graph.remove_edge(first, second, 0, 0).unwrap();
    graph.remove_node(first).unwrap();
    assert_eq!(graph.topological_order(), vec![second]);
}

#[test]
#[tracing_test::traced_test]
fn test_topological_order_with_cycle() {
    let mut graph = Graph::new("cycle");
    let a = add_op(&mut graph, "a", "Relu", &["q"], &["p"]);
    let b = add_op(&mut graph, "b", "Relu", &["p"], &["q"]);
    graph.add_edge(b, a, 0, 0).unwrap();

    assert_eq!(graph.topological_order(), vec![a, b]);
    assert!(logs_contain("graph has a cycle"));
}
