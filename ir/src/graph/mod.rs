//! The mutable graph.
//!
//! [`Graph`] owns nodes, values and edges. Mutation primitives keep the
//! per-node edge mirrors and the producer/consumer tables in sync; they do not
//! cascade. Removing a node whose edges are still attached fails, and callers
//! are expected to detach edges first.
//!
//! # Invariants
//!
//! - At most one edge terminates at any `(node, input slot)`.
//! - An edge connects an output slot and an input slot holding the same value.
//! - Node indices are stable and never reused.
//!
//! Every mutation marks the graph as needing [`Graph::resolve`], which
//! re-checks the invariants above.

mod edges;
mod validate;

use std::collections::{BTreeSet, HashMap, HashSet};

use morph_dtype::TensorType;
use snafu::OptionExt;

use crate::attribute::Attributes;
use crate::error::*;
use crate::node::{Node, NodeIndex};
use crate::value::{NodeArg, TypeUpdate, ValueId};

#[derive(Debug, Clone, Default)]
pub struct Graph {
    name: String,
    nodes: Vec<Option<Node>>,
    live_nodes: usize,
    values: Vec<NodeArg>,
    value_names: HashMap<String, ValueId>,
    outputs: Vec<ValueId>,
    consumers: HashMap<ValueId, BTreeSet<NodeIndex>>,
    producers: HashMap<ValueId, NodeIndex>,
    generated_names: HashSet<String>,
    name_counter: usize,
    resolve_needed: bool,
}

impl Graph {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // =========================================================================
    // Values
    // =========================================================================

    /// Get or create the value with this name.
    pub fn value(&mut self, name: &str) -> ValueId {
        if let Some(&id) = self.value_names.get(name) {
            return id;
        }
        let id = ValueId(self.values.len());
        self.values.push(NodeArg::new(id, name.to_string(), None));
        self.value_names.insert(name.to_string(), id);
        id
    }

    /// Get or create the value with this name and set its descriptor.
    pub fn value_with_type(&mut self, name: &str, ty: TensorType) -> ValueId {
        let id = self.value(name);
        self.values[id.0].set_type(ty);
        id
    }

    pub fn value_by_name(&self, name: &str) -> Option<ValueId> {
        self.value_names.get(name).copied()
    }

    pub fn node_arg(&self, id: ValueId) -> Option<&NodeArg> {
        self.values.get(id.0)
    }

    /// Type descriptor of a value, if the value exists and is typed.
    pub fn value_type(&self, id: ValueId) -> Option<&TensorType> {
        self.node_arg(id)?.ty()
    }

    fn value_name(&self, id: ValueId) -> String {
        self.node_arg(id).map(|arg| arg.name().to_string()).unwrap_or_else(|| id.to_string())
    }

    /// Update a value's descriptor in place.
    ///
    /// Nodes reference values by id, so producers and consumers observe the
    /// new descriptor immediately. The graph is marked for re-resolution.
    pub fn update_type_and_shape(&mut self, id: ValueId, update: &TensorType, mode: TypeUpdate) -> Result<()> {
        let arg = self.values.get_mut(id.0).context(ValueNotFoundSnafu { id })?;
        arg.update_type_and_shape(update, mode)?;
        self.resolve_needed = true;
        Ok(())
    }

    // =========================================================================
    // Graph outputs
    // =========================================================================

    pub fn add_output(&mut self, id: ValueId) -> Result<()> {
        self.ensure_value(id)?;
        if !self.outputs.contains(&id) {
            self.outputs.push(id);
            self.resolve_needed = true;
        }
        Ok(())
    }

    pub fn set_outputs(&mut self, ids: &[ValueId]) -> Result<()> {
        for &id in ids {
            self.ensure_value(id)?;
        }
        self.outputs = ids.to_vec();
        self.resolve_needed = true;
        Ok(())
    }

    pub fn outputs(&self) -> &[ValueId] {
        &self.outputs
    }

    /// Check if the value is declared as a graph output.
    pub fn is_output(&self, id: ValueId) -> bool {
        self.outputs.contains(&id)
    }

    fn ensure_value(&self, id: ValueId) -> Result<()> {
        self.node_arg(id).map(|_| ()).context(ValueNotFoundSnafu { id })
    }

    // =========================================================================
    // Nodes
    // =========================================================================

    /// Add a node over existing values.
    ///
    /// The node starts without edges, schema version or execution provider.
    /// If an output already has a producer, the new node becomes its producer;
    /// this is the transient state while a node is being replaced.
    #[allow(clippy::too_many_arguments)]
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        op_type: impl Into<String>,
        description: impl Into<String>,
        inputs: &[ValueId],
        outputs: &[ValueId],
        attributes: Option<&Attributes>,
        domain: impl Into<String>,
    ) -> Result<NodeIndex> {
        for &id in inputs.iter().chain(outputs) {
            self.ensure_value(id)?;
        }

        let index = NodeIndex(self.nodes.len());
        let node = Node {
            index,
            name: name.into(),
            op_type: op_type.into(),
            domain: domain.into(),
            since_version: None,
            description: description.into(),
            inputs: inputs.iter().copied().collect(),
            outputs: outputs.iter().copied().collect(),
            attributes: attributes.cloned().unwrap_or_default(),
            execution_provider: None,
            input_edges: BTreeSet::new(),
            output_edges: BTreeSet::new(),
        };

        for &id in inputs {
            self.consumers.entry(id).or_default().insert(index);
        }
        for &id in outputs {
            if let Some(previous) = self.producers.insert(id, index) {
                tracing::trace!(value = %self.value_name(id), %previous, new = %index, "value producer replaced");
            }
        }

        tracing::trace!(node.index = %index, node.name = %node.name, op_type = %node.op_type, "node added");
        self.nodes.push(Some(node));
        self.live_nodes += 1;
        self.resolve_needed = true;
        Ok(index)
    }

    /// Remove a node with no attached edges.
    pub fn remove_node(&mut self, index: NodeIndex) -> Result<()> {
        let node = self.node(index).context(NodeNotFoundSnafu { index })?;
        if node.input_edges_count() != 0 || node.output_edges_count() != 0 {
            return NodeHasEdgesSnafu {
                node: index,
                name: node.name.clone(),
                inputs: node.input_edges_count(),
                outputs: node.output_edges_count(),
            }
            .fail();
        }

        let Some(node) = self.nodes[index.0].take() else {
            return NodeNotFoundSnafu { index }.fail();
        };
        for id in &node.inputs {
            if let Some(set) = self.consumers.get_mut(id) {
                set.remove(&index);
                if set.is_empty() {
                    self.consumers.remove(id);
                }
            }
        }
        for id in &node.outputs {
            if self.producers.get(id) == Some(&index) {
                self.producers.remove(id);
            }
        }

        tracing::trace!(node.index = %index, node.name = %node.name, "node removed");
        self.live_nodes -= 1;
        self.resolve_needed = true;
        Ok(())
    }

    pub fn node(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index.0)?.as_ref()
    }

    pub fn node_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        self.nodes.get_mut(index.0)?.as_mut()
    }

    /// Live nodes in index order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().flatten()
    }

    pub fn node_count(&self) -> usize {
        self.live_nodes
    }

    /// One past the largest node index ever handed out.
    pub fn max_node_index(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes that read the named value.
    pub fn consumer_nodes(&self, name: &str) -> Vec<&Node> {
        let Some(id) = self.value_by_name(name) else {
            return Vec::new();
        };
        self.consumers.get(&id).into_iter().flatten().filter_map(|&index| self.node(index)).collect()
    }

    /// Node that writes the value.
    pub fn producer_node(&self, id: ValueId) -> Option<&Node> {
        self.producers.get(&id).and_then(|&index| self.node(index))
    }

    /// Produce a node name that no live node uses and that was never generated before.
    ///
    /// Returns `base` itself when it is free, otherwise `base_token_N`.
    pub fn generate_node_name(&mut self, base: &str) -> String {
        let mut candidate = base.to_string();
        while self.generated_names.contains(&candidate) || self.nodes().any(|node| node.name == candidate) {
            candidate = format!("{base}_token_{}", self.name_counter);
            self.name_counter += 1;
        }
        self.generated_names.insert(candidate.clone());
        candidate
    }

    // =========================================================================
    // Resolution state
    // =========================================================================

    pub fn is_resolve_needed(&self) -> bool {
        self.resolve_needed
    }

    pub fn set_resolve_needed(&mut self) {
        self.resolve_needed = true;
    }
}
