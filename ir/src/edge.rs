//! Slot-addressed edges.

use std::fmt;

use crate::node::NodeIndex;
use crate::value::ValueId;

/// Which side of a node a slot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotDirection {
    Input,
    Output,
}

impl fmt::Display for SlotDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Output => f.write_str("output"),
        }
    }
}

/// One end of an edge as stored on a node.
///
/// On a node's input edge set `node` is the producer; on its output edge set
/// `node` is the consumer. Slots are always `(producer output, consumer input)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeEnd {
    pub node: NodeIndex,
    pub src_slot: usize,
    pub dst_slot: usize,
}

/// Fully described edge, as returned by edge queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphEdge {
    pub src_node: NodeIndex,
    pub dst_node: NodeIndex,
    pub src_slot: usize,
    pub dst_slot: usize,
    /// Value carried along the edge.
    pub value: ValueId,
}

impl fmt::Display for GraphEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} -> {}:{} ({})", self.src_node, self.src_slot, self.dst_node, self.dst_slot, self.value)
    }
}
