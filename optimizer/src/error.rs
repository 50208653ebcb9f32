use morph_ir::{NodeIndex, SlotDirection, ValueId};
use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// A graph primitive failed while a rule was rewiring the graph.
    #[snafu(display("rule '{rule}' failed to mutate the graph: {source}"))]
    Graph { rule: String, source: morph_ir::Error },

    /// Edge slot beyond what the rewritten operator family can carry.
    #[snafu(display("rule '{rule}': {direction} edge of node {node} uses slot {slot}, expected < {bound}"))]
    SlotOutOfBounds { rule: String, node: NodeIndex, direction: SlotDirection, slot: usize, bound: usize },

    /// Edges left on a node that is about to be removed.
    #[snafu(display("rule '{rule}': node {node} still has {inputs} input edge(s) and {outputs} output edge(s) after rewiring"))]
    ResidualEdges { rule: String, node: NodeIndex, inputs: usize, outputs: usize },

    #[snafu(display("rule '{rule}' could not remove node {node}: {source}"))]
    NodeRemoval { rule: String, node: NodeIndex, source: morph_ir::Error },

    #[snafu(display("rule '{rule}' could not update the type of value {value}: {source}"))]
    TypeUpdate { rule: String, value: ValueId, source: morph_ir::Error },

    /// Rule applied to a node that does not exist.
    #[snafu(display("rule '{rule}' was applied to missing node {node}"))]
    MissingNode { rule: String, node: NodeIndex },

    #[snafu(display("rule '{name}' is already registered"))]
    DuplicateRule { name: String },

    /// Graph failed validation after a modifying pass.
    #[snafu(display("graph resolution failed after step {step}: {source}"))]
    Resolve { step: usize, source: morph_ir::Error },
}
