use std::collections::{BTreeSet, HashMap};

use snafu::ensure;

use super::Graph;
use crate::edge::EdgeEnd;
use crate::error::*;
use crate::node::NodeIndex;

impl Graph {
    /// Check the structural invariants.
    ///
    /// - every edge end points at a live node and a slot within arity,
    /// - input and output edge mirrors agree,
    /// - both ends of an edge hold the same value,
    /// - at most one edge per destination slot.
    pub fn validate(&self) -> Result<()> {
        for node in self.nodes() {
            let mut fed_slots = BTreeSet::new();
            for end in &node.input_edges {
                let producer = self.node(end.node);
                ensure!(
                    producer.is_some(),
                    InvalidGraphSnafu { reason: format!("{} has an input edge from removed node {}", node, end.node) }
                );
                ensure!(
                    end.dst_slot < node.inputs.len(),
                    InvalidGraphSnafu { reason: format!("{} has an input edge on missing slot {}", node, end.dst_slot) }
                );
                ensure!(
                    fed_slots.insert(end.dst_slot),
                    InvalidGraphSnafu { reason: format!("input slot {} of {} has more than one writer", end.dst_slot, node) }
                );

                let mirror = EdgeEnd { node: node.index, src_slot: end.src_slot, dst_slot: end.dst_slot };
                ensure!(
                    producer.is_some_and(|p| p.output_edges.contains(&mirror)),
                    InvalidGraphSnafu { reason: format!("input edge of {} from {} has no output mirror", node, end.node) }
                );
            }

            for end in &node.output_edges {
                let consumer = self.node(end.node);
                ensure!(
                    end.src_slot < node.outputs.len(),
                    InvalidGraphSnafu { reason: format!("{} has an output edge on missing slot {}", node, end.src_slot) }
                );
                let mirror = EdgeEnd { node: node.index, src_slot: end.src_slot, dst_slot: end.dst_slot };
                let Some(consumer) = consumer.filter(|c| c.input_edges.contains(&mirror)) else {
                    return InvalidGraphSnafu { reason: format!("output edge of {} to {} has no input mirror", node, end.node) }
                        .fail();
                };
                ensure!(
                    consumer.inputs.get(end.dst_slot) == Some(&node.outputs[end.src_slot]),
                    InvalidGraphSnafu {
                        reason: format!("edge {}:{} -> {}:{} carries mismatched values", node.index, end.src_slot, consumer.index, end.dst_slot)
                    }
                );
            }
        }
        Ok(())
    }

    /// Validate and clear the resolve-needed flag.
    pub fn resolve(&mut self) -> Result<()> {
        if let Err(error) = self.validate() {
            tracing::error!(graph = %self.name, %error, "graph resolution failed");
            return Err(error);
        }
        self.resolve_needed = false;
        Ok(())
    }

    /// Nodes ordered so that every edge goes from an earlier to a later node.
    ///
    /// Kahn's algorithm; among ready nodes the smallest index goes first so the
    /// order is deterministic. Nodes on a cycle are appended in index order.
    pub fn topological_order(&self) -> Vec<NodeIndex> {
        let mut pending: HashMap<NodeIndex, usize> =
            self.nodes().map(|node| (node.index, node.input_edges.iter().map(|end| end.node).collect::<BTreeSet<_>>().len())).collect();
        let mut ready: BTreeSet<NodeIndex> = pending.iter().filter(|&(_, &count)| count == 0).map(|(&index, _)| index).collect();
        let mut order = Vec::with_capacity(self.node_count());

        while let Some(index) = ready.pop_first() {
            order.push(index);
            pending.remove(&index);
            let Some(node) = self.node(index) else { continue };
            let consumers: BTreeSet<NodeIndex> = node.output_edges.iter().map(|end| end.node).collect();
            for consumer in consumers {
                if let Some(count) = pending.get_mut(&consumer) {
                    *count -= 1;
                    if *count == 0 {
                        ready.insert(consumer);
                    }
                }
            }
        }

        if !pending.is_empty() {
            tracing::warn!(graph = %self.name, remaining = pending.len(), "graph has a cycle");
            let mut rest: Vec<NodeIndex> = pending.into_keys().collect();
            rest.sort();
            order.extend(rest);
        }
        order
    }
}
