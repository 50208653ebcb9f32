//! Common imports for building and inspecting graphs.
//!
//! ```rust,ignore
//! use morph_ir::prelude::*;
//! ```

pub use crate::attribute::{AttributeValue, Attributes};
pub use crate::edge::GraphEdge;
pub use crate::graph::Graph;
pub use crate::node::{Node, NodeIndex};
pub use crate::utils::{MS_DOMAIN, ONNX_DOMAIN, is_supported_optype_version_and_domain};
pub use crate::value::{TypeUpdate, ValueId};

pub use morph_dtype::{Dim, ExecutionProvider, ScalarDType, TensorType};
