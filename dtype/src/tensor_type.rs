//! Tensor type descriptors.
//!
//! A [`TensorType`] is what a value reference in the graph carries: an element
//! type and, when known, a shape. Dimensions are either concrete or named
//! symbolic parameters (`batch`, `seq_len`, ...).

use std::fmt;

use smallvec::SmallVec;

use crate::ScalarDType;

/// One dimension of a tensor shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dim {
    /// Concrete extent.
    Const(usize),
    /// Named runtime parameter.
    Symbolic(String),
}

impl Dim {
    pub fn symbolic(name: impl Into<String>) -> Self {
        Self::Symbolic(name.into())
    }

    pub fn as_const(&self) -> Option<usize> {
        match self {
            Self::Const(v) => Some(*v),
            Self::Symbolic(_) => None,
        }
    }
}

impl From<usize> for Dim {
    fn from(value: usize) -> Self {
        Self::Const(value)
    }
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const(v) => write!(f, "{v}"),
            Self::Symbolic(name) => f.write_str(name),
        }
    }
}

/// Tensor shape.
///
/// Inline capacity of 4 covers the common ranks without heap allocation.
pub type Shape = SmallVec<[Dim; 4]>;

/// Element type plus optional shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TensorType {
    pub elem: ScalarDType,
    /// `None` when the rank is unknown.
    pub shape: Option<Shape>,
}

impl TensorType {
    /// Descriptor with unknown shape.
    pub fn new(elem: ScalarDType) -> Self {
        Self { elem, shape: None }
    }

    pub fn with_shape(elem: ScalarDType, shape: impl IntoIterator<Item = Dim>) -> Self {
        Self { elem, shape: Some(shape.into_iter().collect()) }
    }

    /// Descriptor with a fully concrete shape.
    pub fn with_dims(elem: ScalarDType, dims: &[usize]) -> Self {
        Self::with_shape(elem, dims.iter().copied().map(Dim::Const))
    }

    /// Number of elements if the shape is fully concrete. Rank 0 holds one element.
    pub fn num_elements(&self) -> Option<usize> {
        self.shape.as_ref()?.iter().try_fold(1usize, |acc, dim| acc.checked_mul(dim.as_const()?))
    }
}

impl fmt::Display for TensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tensor({})", self.elem)?;
        match &self.shape {
            None => f.write_str("[?]"),
            Some(shape) => {
                f.write_str("[")?;
                for (i, dim) in shape.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{dim}")?;
                }
                f.write_str("]")
            }
        }
    }
}
