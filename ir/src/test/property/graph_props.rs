use std::collections::HashMap;

use proptest::prelude::*;

use super::generators::arb_dag;

proptest! {
    #[test]
    fn random_dags_are_valid(dag in arb_dag(12)) {
        let graph = dag.build();
        prop_assert!(graph.validate().is_ok());
        prop_assert_eq!(graph.node_count(), dag.nodes.len());
        prop_assert_eq!(graph.edge_count(), graph.edges().len());
    }

    #[test]
    fn topological_order_respects_edges(dag in arb_dag(12)) {
        let graph = dag.build();
        let order = graph.topological_order();
        prop_assert_eq!(order.len(), graph.node_count());

        let position: HashMap<_, _> = order.iter().enumerate().map(|(i, &n)| (n, i)).collect();
        for edge in graph.edges() {
            prop_assert!(position[&edge.src_node] < position[&edge.dst_node]);
        }
    }

    #[test]
    fn per_node_edge_queries_partition_edges(dag in arb_dag(12)) {
        let graph = dag.build();
        let mut inbound = 0;
        let mut outbound = 0;
        for node in graph.nodes() {
            inbound += graph.node_input_edges(node.index()).unwrap().len();
            outbound += graph.node_output_edges(node.index()).unwrap().len();
        }
        prop_assert_eq!(inbound, graph.edge_count());
        prop_assert_eq!(outbound, graph.edge_count());
    }
}
