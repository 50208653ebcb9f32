//! Dropout → BitmaskDropout rewrite.
//!
//! `BitmaskDropout` produces the same data output as `Dropout` but packs the
//! optional mask into one bit per element, stored in `uint32` words. It only
//! has a GPU kernel, and nothing may read the mask, since its encoding changes.
//!
//! ```text
//!   x ──► Dropout ──► y            x ──► BitmaskDropout ──► y
//!  (ratio, training)  └─► mask      (ratio, training)       └─► mask: uint32[ceil(n/32)]
//! ```

use morph_dtype::{Dim, ExecutionProvider, ScalarDType, TensorType};
use morph_ir::utils::{MS_DOMAIN, ONNX_DOMAIN, is_supported_optype_version_and_domain};
use morph_ir::{Graph, Node, NodeIndex, SlotDirection, TypeUpdate, ValueId};
use snafu::{OptionExt, ResultExt};

use crate::error::*;
use crate::rule::{RewriteRule, RewriteRuleEffect};

/// Rewrites `Dropout` nodes on CUDA into `com.microsoft::BitmaskDropout`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DropoutBitmaskRewrite;

impl DropoutBitmaskRewrite {
    pub const NAME: &'static str = "DropoutBitmaskRewrite";

    /// `Dropout` schema versions whose inputs and outputs line up with `BitmaskDropout`.
    pub const SUPPORTED_VERSIONS: [u32; 2] = [12, 13];

    pub const REPLACEMENT_OP_TYPE: &'static str = "BitmaskDropout";
    pub const REPLACEMENT_VERSION: u32 = 1;
    pub const DESCRIPTION: &'static str = "Written from Dropout node";
    pub const NAME_SUFFIX: &'static str = "_bitmask_rewritten";

    /// Inputs are `data`, `ratio`, `training_mode`.
    pub const MAX_INPUT_SLOTS: usize = 3;
    /// Outputs are `output`, `mask`.
    pub const MAX_OUTPUT_SLOTS: usize = 2;
    pub const MASK_OUTPUT: usize = 1;

    /// Bits of mask packed into one output element.
    pub const MASK_WORD_BITS: usize = 32;

    pub fn new() -> Self {
        Self
    }

    /// Check if `BitmaskDropout` has a kernel for this provider.
    pub fn is_supported_provider(provider: &ExecutionProvider) -> bool {
        matches!(provider, ExecutionProvider::Cuda)
    }
}

impl RewriteRule for DropoutBitmaskRewrite {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn target_op_types(&self) -> &[&'static str] {
        &["Dropout"]
    }

    fn satisfy_condition(&self, graph: &Graph, node: &Node) -> bool {
        if !is_supported_optype_version_and_domain(node, "Dropout", &Self::SUPPORTED_VERSIONS, ONNX_DOMAIN) {
            tracing::debug!(node.name = node.name(), version = ?node.since_version(), "unsupported Dropout version");
            return false;
        }

        if !node.execution_provider().is_some_and(Self::is_supported_provider) {
            tracing::debug!(
                node.name = node.name(),
                provider = node.execution_provider().map(ExecutionProvider::name),
                "BitmaskDropout has no kernel for this provider"
            );
            return false;
        }

        let Some(&mask) = node.outputs().get(Self::MASK_OUTPUT) else {
            return true;
        };
        let Some(mask_arg) = graph.node_arg(mask) else {
            return true;
        };

        if graph.is_output(mask) {
            tracing::debug!(node.name = node.name(), mask = mask_arg.name(), "Dropout mask is a graph output");
            return false;
        }

        let consumers = graph.consumer_nodes(mask_arg.name());
        if !consumers.is_empty() {
            for consumer in &consumers {
                tracing::debug!(
                    node.name = node.name(),
                    mask = mask_arg.name(),
                    consumer.name = consumer.name(),
                    consumer.op_type = consumer.op_type(),
                    "Dropout mask is consumed by another node"
                );
            }
            return false;
        }

        true
    }

    fn apply(&self, graph: &mut Graph, index: NodeIndex) -> Result<RewriteRuleEffect> {
        let node = graph.node(index).context(MissingNodeSnafu { rule: Self::NAME, node: index })?;
        let name = node.name().to_string();
        let inputs: Vec<ValueId> = node.inputs().to_vec();
        let outputs: Vec<ValueId> = node.outputs().to_vec();
        let attributes = node.attributes().clone();
        let provider = node.execution_provider().cloned();

        check_edge_slots(graph, index)?;

        let replacement_name = graph.generate_node_name(&format!("{name}{}", Self::NAME_SUFFIX));
        let replacement = graph
            .add_node(
                replacement_name,
                Self::REPLACEMENT_OP_TYPE,
                Self::DESCRIPTION,
                &inputs,
                &outputs,
                Some(&attributes),
                MS_DOMAIN,
            )
            .context(GraphSnafu { rule: Self::NAME })?;
        let new_node = graph.node_mut(replacement).context(MissingNodeSnafu { rule: Self::NAME, node: replacement })?;
        new_node.set_since_version(Self::REPLACEMENT_VERSION);
        new_node.set_execution_provider(provider);

        rehome_input_edges(graph, index, replacement)?;
        rehome_output_edges(graph, index, replacement)?;
        remove_rewritten_node(graph, index)?;

        if let Some(&mask) = outputs.get(Self::MASK_OUTPUT) {
            let packed = packed_mask_type(graph, mask, inputs.first().copied());
            graph
                .update_type_and_shape(mask, &packed, TypeUpdate::OVERRIDE)
                .inspect_err(|error| tracing::error!(rule = Self::NAME, value = %mask, %error, "mask type update failed"))
                .context(TypeUpdateSnafu { rule: Self::NAME, value: mask })?;
        }

        tracing::debug!(node.name = %name, replacement = %replacement, "Dropout rewritten to BitmaskDropout");
        Ok(RewriteRuleEffect::RemovedCurrentNode)
    }
}

// ============================================================================
// Rewiring
// ============================================================================

/// Reject edges on slots `BitmaskDropout` does not have, before anything is mutated.
pub(crate) fn check_edge_slots(graph: &Graph, index: NodeIndex) -> Result<()> {
    let inbound = graph.node_input_edges(index).context(GraphSnafu { rule: DropoutBitmaskRewrite::NAME })?;
    if let Some(edge) = inbound.iter().find(|e| e.dst_slot >= DropoutBitmaskRewrite::MAX_INPUT_SLOTS) {
        return slot_out_of_bounds(index, SlotDirection::Input, edge.dst_slot, DropoutBitmaskRewrite::MAX_INPUT_SLOTS);
    }

    let outbound = graph.node_output_edges(index).context(GraphSnafu { rule: DropoutBitmaskRewrite::NAME })?;
    if let Some(edge) = outbound.iter().find(|e| e.src_slot >= DropoutBitmaskRewrite::MAX_OUTPUT_SLOTS) {
        return slot_out_of_bounds(index, SlotDirection::Output, edge.src_slot, DropoutBitmaskRewrite::MAX_OUTPUT_SLOTS);
    }
    Ok(())
}

fn slot_out_of_bounds(node: NodeIndex, direction: SlotDirection, slot: usize, bound: usize) -> Result<()> {
    tracing::error!(rule = DropoutBitmaskRewrite::NAME, node = %node, %direction, slot, bound, "edge slot out of bounds");
    SlotOutOfBoundsSnafu { rule: DropoutBitmaskRewrite::NAME, node, direction, slot, bound }.fail()
}

/// Move every inbound edge of `from` onto the same input slot of `to`.
///
/// `to` has no inbound edges yet, so the new edge is added before the old one
/// is removed.
pub(crate) fn rehome_input_edges(graph: &mut Graph, from: NodeIndex, to: NodeIndex) -> Result<()> {
    let rule = DropoutBitmaskRewrite::NAME;
    for edge in graph.node_input_edges(from).context(GraphSnafu { rule })? {
        if edge.dst_slot >= DropoutBitmaskRewrite::MAX_INPUT_SLOTS {
            return slot_out_of_bounds(from, SlotDirection::Input, edge.dst_slot, DropoutBitmaskRewrite::MAX_INPUT_SLOTS);
        }
        graph.add_edge(edge.src_node, to, edge.src_slot, edge.dst_slot).context(GraphSnafu { rule })?;
        graph.remove_edge(edge.src_node, from, edge.src_slot, edge.dst_slot).context(GraphSnafu { rule })?;
    }
    Ok(())
}

/// Move every outbound edge of `from` onto the same output slot of `to`.
///
/// The consumer slot can only have one writer, so the old edge goes first.
pub(crate) fn rehome_output_edges(graph: &mut Graph, from: NodeIndex, to: NodeIndex) -> Result<()> {
    let rule = DropoutBitmaskRewrite::NAME;
    for edge in graph.node_output_edges(from).context(GraphSnafu { rule })? {
        if edge.src_slot >= DropoutBitmaskRewrite::MAX_OUTPUT_SLOTS {
            return slot_out_of_bounds(from, SlotDirection::Output, edge.src_slot, DropoutBitmaskRewrite::MAX_OUTPUT_SLOTS);
        }
        graph.remove_edge(from, edge.dst_node, edge.src_slot, edge.dst_slot).context(GraphSnafu { rule })?;
        graph.add_edge(to, edge.dst_node, edge.src_slot, edge.dst_slot).context(GraphSnafu { rule })?;
    }
    Ok(())
}

/// Remove the rewritten node, refusing while any edge is still attached.
pub(crate) fn remove_rewritten_node(graph: &mut Graph, index: NodeIndex) -> Result<()> {
    let rule = DropoutBitmaskRewrite::NAME;
    let node = graph.node(index).context(MissingNodeSnafu { rule, node: index })?;
    let (inputs, outputs) = (node.input_edges_count(), node.output_edges_count());
    if inputs != 0 || outputs != 0 {
        tracing::error!(rule, node = %index, node.name = node.name(), inputs, outputs, "edges left on rewritten node");
        return ResidualEdgesSnafu { rule, node: index, inputs, outputs }.fail();
    }

    graph
        .remove_node(index)
        .inspect_err(|error| tracing::error!(rule, node = %index, %error, "failed to remove rewritten node"))
        .context(NodeRemovalSnafu { rule, node: index })
}

// ============================================================================
// Mask type
// ============================================================================

/// Descriptor of the packed mask: `uint32[ceil(n / 32)]`.
///
/// `n` is the element count of the old mask, or of the data input when the
/// mask is untyped. Without a static element count the single dimension is
/// symbolic.
pub(crate) fn packed_mask_type(graph: &Graph, mask: ValueId, data: Option<ValueId>) -> TensorType {
    let elements = graph
        .value_type(mask)
        .and_then(TensorType::num_elements)
        .or_else(|| data.and_then(|d| graph.value_type(d)).and_then(TensorType::num_elements));

    let words = match elements {
        Some(n) => Dim::Const(n.div_ceil(DropoutBitmaskRewrite::MASK_WORD_BITS)),
        None => {
            let mask_name = graph.node_arg(mask).map_or_else(|| mask.to_string(), |arg| arg.name().to_string());
            tracing::warn!(mask = %mask_name, "mask element count unknown, packed length left symbolic");
            Dim::symbolic(format!("{mask_name}_bitmask_words"))
        }
    };
    TensorType::with_shape(ScalarDType::UInt32, [words])
}
