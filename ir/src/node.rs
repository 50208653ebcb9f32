//! Graph nodes.

use std::collections::BTreeSet;
use std::fmt;

use morph_dtype::ExecutionProvider;
use smallvec::SmallVec;

use crate::attribute::Attributes;
use crate::edge::EdgeEnd;
use crate::value::ValueId;

/// Stable index of a node. Indices are never reused after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub(crate) usize);

impl NodeIndex {
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One operator instance.
///
/// Input and output lists are fixed at creation. Edges are owned by the graph
/// and mirrored here so per-node edge queries do not scan the whole graph.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) index: NodeIndex,
    pub(crate) name: String,
    pub(crate) op_type: String,
    pub(crate) domain: String,
    pub(crate) since_version: Option<u32>,
    pub(crate) description: String,
    pub(crate) inputs: SmallVec<[ValueId; 4]>,
    pub(crate) outputs: SmallVec<[ValueId; 2]>,
    pub(crate) attributes: Attributes,
    pub(crate) execution_provider: Option<ExecutionProvider>,
    pub(crate) input_edges: BTreeSet<EdgeEnd>,
    pub(crate) output_edges: BTreeSet<EdgeEnd>,
}

impl Node {
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn op_type(&self) -> &str {
        &self.op_type
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Opset version of the schema this node was resolved against.
    pub fn since_version(&self) -> Option<u32> {
        self.since_version
    }

    pub fn set_since_version(&mut self, version: u32) {
        self.since_version = Some(version);
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn inputs(&self) -> &[ValueId] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[ValueId] {
        &self.outputs
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    pub fn execution_provider(&self) -> Option<&ExecutionProvider> {
        self.execution_provider.as_ref()
    }

    pub fn set_execution_provider(&mut self, provider: Option<ExecutionProvider>) {
        self.execution_provider = provider;
    }

    /// Producers feeding this node, by `(producer, output slot, input slot)`.
    pub fn input_edges(&self) -> impl Iterator<Item = &EdgeEnd> {
        self.input_edges.iter()
    }

    /// Consumers fed by this node, by `(consumer, output slot, input slot)`.
    pub fn output_edges(&self) -> impl Iterator<Item = &EdgeEnd> {
        self.output_edges.iter()
    }

    pub fn input_edges_count(&self) -> usize {
        self.input_edges.len()
    }

    pub fn output_edges_count(&self) -> usize {
        self.output_edges.len()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' ", self.index, self.name)?;
        if !self.domain.is_empty() {
            write!(f, "{}::", self.domain)?;
        }
        f.write_str(&self.op_type)?;
        if let Some(version) = self.since_version {
            write!(f, "-{version}")?;
        }
        Ok(())
    }
}
