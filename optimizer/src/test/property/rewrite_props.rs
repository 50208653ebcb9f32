use std::collections::{BTreeSet, HashMap};

use morph_dtype::{ScalarDType, TensorType};
use morph_ir::{GraphEdge, NodeIndex};
use proptest::prelude::*;

use super::generators::arb_chain;
use crate::config::TransformerConfig;
use crate::rule::{RewriteRule, RewriteRuleEffect};
use crate::rules::DropoutBitmaskRewrite;
use crate::test::helpers::count_op;
use crate::transformer::RuleBasedGraphTransformer;

/// Edge with rewritten nodes replaced by their replacements.
fn edge_key(edge: &GraphEdge, replaced: &HashMap<NodeIndex, NodeIndex>) -> (NodeIndex, NodeIndex, usize, usize, usize) {
    let map = |n: NodeIndex| replaced.get(&n).copied().unwrap_or(n);
    (map(edge.src_node), map(edge.dst_node), edge.src_slot, edge.dst_slot, edge.value.index())
}

proptest! {
    #[test]
    fn rewrite_preserves_connectivity(chain in arb_chain(8)) {
        let mut graph = chain.build();
        let rule = DropoutBitmaskRewrite;
        let before = graph.edges();
        let mut replaced = HashMap::new();

        let candidates: Vec<NodeIndex> =
            graph.nodes().filter(|n| rule.satisfy_condition(&graph, n)).map(|n| n.index()).collect();
        prop_assert_eq!(candidates.len(), chain.eligible());

        for index in candidates {
            let data = graph.node(index).unwrap().outputs()[0];
            let effect = rule.apply(&mut graph, index).unwrap();
            prop_assert_eq!(effect, RewriteRuleEffect::RemovedCurrentNode);
            prop_assert!(graph.node(index).is_none());
            replaced.insert(index, graph.producer_node(data).unwrap().index());
        }

        let no_renames = HashMap::new();
        let expected: BTreeSet<_> = before.iter().map(|e| edge_key(e, &replaced)).collect();
        let actual: BTreeSet<_> = graph.edges().iter().map(|e| edge_key(e, &no_renames)).collect();
        prop_assert_eq!(graph.edge_count(), before.len());
        prop_assert_eq!(actual, expected);
        prop_assert!(graph.validate().is_ok());
    }

    #[test]
    fn transformer_rewrites_every_eligible_dropout(chain in arb_chain(8)) {
        let mut graph = chain.build();
        let dropouts = count_op(&graph, "Dropout");
        let transformer = RuleBasedGraphTransformer::with_default_rules("prop", TransformerConfig::default()).unwrap();

        let modified = transformer.apply(&mut graph).unwrap();
        prop_assert_eq!(modified, chain.eligible() > 0);
        prop_assert_eq!(count_op(&graph, "BitmaskDropout"), chain.eligible());
        prop_assert_eq!(count_op(&graph, "Dropout"), dropouts - chain.eligible());
        prop_assert!(!transformer.apply(&mut graph).unwrap());

        let packed = TensorType::with_dims(ScalarDType::UInt32, &[chain.elements.div_ceil(32)]);
        for node in graph.nodes().filter(|n| n.op_type() == "BitmaskDropout") {
            prop_assert_eq!(graph.value_type(node.outputs()[1]), Some(&packed));
        }
    }
}
