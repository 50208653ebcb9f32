//! Graph model for the Morph optimizer.
//!
//! This crate defines the mutable dataflow graph that rewrite rules operate on.
//!
//! # Module Organization
//!
//! - [`graph`] - The graph: mutation and query primitives, validation, ordering
//! - [`node`] - Nodes and their stable indices
//! - [`edge`] - Slot-addressed edges
//! - [`value`] - Value references and in-place type updates
//! - [`attribute`] - Typed node attributes
//! - [`utils`] - Operator/domain/version predicates
//! - [`error`] - Error types and result handling

pub mod attribute;
pub mod edge;
pub mod error;
pub mod graph;
pub mod node;
pub mod prelude;
pub mod utils;
pub mod value;

#[cfg(any(test, feature = "proptest"))]
pub mod test;

pub use attribute::{AttributeValue, Attributes};
pub use edge::{EdgeEnd, GraphEdge, SlotDirection};
pub use error::{Error, Result};
pub use graph::Graph;
pub use node::{Node, NodeIndex};
pub use value::{NodeArg, TypeUpdate, ValueId};

// Re-export external types for convenience
pub use morph_dtype::{Dim, ExecutionProvider, ScalarDType, Shape, TensorType};
