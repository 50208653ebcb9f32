use snafu::{OptionExt, ensure};

use super::Graph;
use crate::edge::{EdgeEnd, GraphEdge, SlotDirection};
use crate::error::*;
use crate::node::NodeIndex;
use crate::value::ValueId;

impl Graph {
    /// Connect output `src_slot` of `src` to input `dst_slot` of `dst`.
    ///
    /// Fails if either slot is out of range, the slots hold different values,
    /// or the destination slot already has a writer.
    pub fn add_edge(&mut self, src: NodeIndex, dst: NodeIndex, src_slot: usize, dst_slot: usize) -> Result<()> {
        let src_value = self.output_value(src, src_slot)?;
        let dst_value = self.input_value(dst, dst_slot)?;
        ensure!(
            src_value == dst_value,
            EdgeValueMismatchSnafu {
                src,
                src_slot,
                src_value: self.value_name(src_value),
                dst,
                dst_slot,
                dst_value: self.value_name(dst_value),
            }
        );

        let dst_node = self.node(dst).context(NodeNotFoundSnafu { index: dst })?;
        if let Some(existing) = dst_node.input_edges.iter().find(|end| end.dst_slot == dst_slot) {
            return SlotOccupiedSnafu { node: dst, slot: dst_slot, existing: existing.node, existing_slot: existing.src_slot }
                .fail();
        }

        self.node_entry(src)?.output_edges.insert(EdgeEnd { node: dst, src_slot, dst_slot });
        self.node_entry(dst)?.input_edges.insert(EdgeEnd { node: src, src_slot, dst_slot });
        self.resolve_needed = true;
        Ok(())
    }

    /// Disconnect an existing edge.
    pub fn remove_edge(&mut self, src: NodeIndex, dst: NodeIndex, src_slot: usize, dst_slot: usize) -> Result<()> {
        let value = self.output_value(src, src_slot)?;
        let edge = GraphEdge { src_node: src, dst_node: dst, src_slot, dst_slot, value };

        let out_end = EdgeEnd { node: dst, src_slot, dst_slot };
        let in_end = EdgeEnd { node: src, src_slot, dst_slot };
        let attached = self.node(src).is_some_and(|n| n.output_edges.contains(&out_end))
            && self.node(dst).is_some_and(|n| n.input_edges.contains(&in_end));
        ensure!(attached, EdgeNotFoundSnafu { edge });

        self.node_entry(src)?.output_edges.remove(&out_end);
        self.node_entry(dst)?.input_edges.remove(&in_end);
        self.resolve_needed = true;
        Ok(())
    }

    /// Edges terminating at `index`, ordered by producer then slots.
    pub fn node_input_edges(&self, index: NodeIndex) -> Result<Vec<GraphEdge>> {
        let node = self.node(index).context(NodeNotFoundSnafu { index })?;
        Ok(node
            .input_edges
            .iter()
            .map(|end| GraphEdge {
                src_node: end.node,
                dst_node: index,
                src_slot: end.src_slot,
                dst_slot: end.dst_slot,
                value: node.inputs[end.dst_slot],
            })
            .collect())
    }

    /// Edges originating at `index`, ordered by consumer then slots.
    pub fn node_output_edges(&self, index: NodeIndex) -> Result<Vec<GraphEdge>> {
        let node = self.node(index).context(NodeNotFoundSnafu { index })?;
        Ok(node
            .output_edges
            .iter()
            .map(|end| GraphEdge {
                src_node: index,
                dst_node: end.node,
                src_slot: end.src_slot,
                dst_slot: end.dst_slot,
                value: node.outputs[end.src_slot],
            })
            .collect())
    }

    /// All edges in the graph.
    pub fn edges(&self) -> Vec<GraphEdge> {
        self.nodes()
            .flat_map(|node| {
                node.output_edges.iter().map(move |end| GraphEdge {
                    src_node: node.index,
                    dst_node: end.node,
                    src_slot: end.src_slot,
                    dst_slot: end.dst_slot,
                    value: node.outputs[end.src_slot],
                })
            })
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes().map(|node| node.output_edges.len()).sum()
    }

    fn node_entry(&mut self, index: NodeIndex) -> Result<&mut crate::node::Node> {
        self.node_mut(index).context(NodeNotFoundSnafu { index })
    }

    fn output_value(&self, index: NodeIndex, slot: usize) -> Result<ValueId> {
        let node = self.node(index).context(NodeNotFoundSnafu { index })?;
        node.outputs.get(slot).copied().context(SlotOutOfRangeSnafu {
            node: index,
            name: node.name.clone(),
            direction: SlotDirection::Output,
            slot,
            arity: node.outputs.len(),
        })
    }

    fn input_value(&self, index: NodeIndex, slot: usize) -> Result<ValueId> {
        let node = self.node(index).context(NodeNotFoundSnafu { index })?;
        node.inputs.get(slot).copied().context(SlotOutOfRangeSnafu {
            node: index,
            name: node.name.clone(),
            direction: SlotDirection::Input,
            slot,
            arity: node.inputs.len(),
        })
    }
}
