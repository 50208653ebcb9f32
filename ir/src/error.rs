use morph_dtype::{Dim, ScalarDType};
use snafu::Snafu;

use crate::edge::{GraphEdge, SlotDirection};
use crate::node::NodeIndex;
use crate::value::ValueId;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Node index does not refer to a live node.
    #[snafu(display("node {index} does not exist"))]
    NodeNotFound { index: NodeIndex },

    /// Value id was not created by this graph.
    #[snafu(display("value {id} does not exist"))]
    ValueNotFound { id: ValueId },

    /// Slot index beyond the node's fixed arity.
    #[snafu(display("node {node} ('{name}') has no {direction} slot {slot}: arity is {arity}"))]
    SlotOutOfRange { node: NodeIndex, name: String, direction: SlotDirection, slot: usize, arity: usize },

    /// A destination input slot already has a writer.
    #[snafu(display("input slot {slot} of node {node} is already fed by output {existing_slot} of node {existing}"))]
    SlotOccupied { node: NodeIndex, slot: usize, existing: NodeIndex, existing_slot: usize },

    /// Edge endpoints refer to different values.
    #[snafu(display(
        "edge value mismatch: output {src_slot} of node {src} is '{src_value}' but input {dst_slot} of node {dst} is '{dst_value}'"
    ))]
    EdgeValueMismatch {
        src: NodeIndex,
        src_slot: usize,
        src_value: String,
        dst: NodeIndex,
        dst_slot: usize,
        dst_value: String,
    },

    /// Edge to remove is not attached.
    #[snafu(display("edge {edge} does not exist"))]
    EdgeNotFound { edge: GraphEdge },

    /// Node removal requested while edges are still attached.
    #[snafu(display("cannot remove node {node} ('{name}'): {inputs} input edge(s) and {outputs} output edge(s) attached"))]
    NodeHasEdges { node: NodeIndex, name: String, inputs: usize, outputs: usize },

    /// In-place type update changes the element type without override.
    #[snafu(display("type mismatch for '{value}': existing {existing}, update {update}"))]
    ElementTypeMismatch { value: String, existing: ScalarDType, update: ScalarDType },

    /// In-place type update with a different rank under strict merging.
    #[snafu(display("shape rank mismatch for '{value}': existing rank {existing}, update rank {update}"))]
    ShapeRankMismatch { value: String, existing: usize, update: usize },

    /// In-place type update with conflicting concrete dimensions under strict merging.
    #[snafu(display("dimension {dim} of '{value}' conflicts: existing {existing}, update {update}"))]
    ShapeDimMismatch { value: String, dim: usize, existing: Dim, update: Dim },

    /// Structural check in `Graph::validate` failed.
    #[snafu(display("graph invariant violated: {reason}"))]
    InvalidGraph { reason: String },
}
