//! Generators for random graphs.

use proptest::prelude::*;

use crate::Graph;
use crate::test::helpers::add_op;

/// Description of a random layered DAG.
///
/// Node `i` reads `inputs[i]` values chosen among the graph input and the
/// outputs of earlier nodes, so the result is acyclic by construction.
#[derive(Debug, Clone)]
pub struct DagSpec {
    pub nodes: Vec<Vec<usize>>,
    pub outputs: Vec<usize>,
}

impl DagSpec {
    /// Materialize as a graph. Value `v0` is the graph input, value `v{i+1}`
    /// is the output of node `i`.
    pub fn build(&self) -> Graph {
        let mut graph = Graph::new("random_dag");
        for (i, inputs) in self.nodes.iter().enumerate() {
            let input_names: Vec<String> = inputs.iter().map(|v| format!("v{v}")).collect();
            let input_refs: Vec<&str> = input_names.iter().map(String::as_str).collect();
            let output = format!("v{}", i + 1);
            add_op(&mut graph, &format!("n{i}"), "Add", &input_refs, &[output.as_str()]);
        }
        for &v in &self.outputs {
            let id = graph.value(&format!("v{v}"));
            graph.add_output(id).expect("output exists");
        }
        graph
    }
}

/// Random DAG with 1..`max_nodes` nodes, each with 1..=3 inputs.
pub fn arb_dag(max_nodes: usize) -> impl Strategy<Value = DagSpec> {
    (1..max_nodes.max(2))
        .prop_flat_map(|n| {
            let nodes: Vec<_> = (0..n).map(|i| prop::collection::vec(0..=i, 1..=3)).collect();
            (nodes, prop::collection::vec(1..=n, 0..=2))
        })
        .prop_map(|(nodes, outputs)| DagSpec { nodes, outputs })
}
