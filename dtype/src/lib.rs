//! Element types and type descriptors shared by the Morph graph crates.
//!
//! # Module Organization
//!
//! - [`tensor_type`] - Tensor type descriptors (element type + optional shape)
//! - [`provider`] - Execution provider tags assigned to graph nodes
//! - [`error`] - Parsing errors

pub mod error;
pub mod provider;
pub mod tensor_type;


pub use error::{Error, Result};
pub use provider::ExecutionProvider;
pub use tensor_type::{Dim, Shape, TensorType};

/// Tensor element types.
///
/// Discriminants are the ONNX `TensorProto.DataType` codes, so a serialized
/// element type converts with [`ScalarDType::from_onnx`] / [`ScalarDType::onnx_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(strum::EnumCount, strum::EnumIter, strum::FromRepr)]
#[cfg_attr(any(test, feature = "proptest"), derive(proptest_derive::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i32)]
pub enum ScalarDType {
    Float32 = 1,
    UInt8 = 2,
    Int8 = 3,
    UInt16 = 4,
    Int16 = 5,
    Int32 = 6,
    Int64 = 7,
    Bool = 9,
    Float16 = 10,
    Float64 = 11,
    UInt32 = 12,
    UInt64 = 13,
    BFloat16 = 16,
    FP8E4M3 = 17,
    FP8E5M2 = 19,
}

impl ScalarDType {
    pub const fn bytes(&self) -> usize {
        match self {
            Self::Bool => 1,
            Self::Int8 => 1,
            Self::Int16 => 2,
            Self::Int32 => 4,
            Self::Int64 => 8,
            Self::UInt8 => 1,
            Self::UInt16 => 2,
            Self::UInt32 => 4,
            Self::UInt64 => 8,
            Self::FP8E4M3 => 1,
            Self::FP8E5M2 => 1,
            Self::Float16 => 2,
            Self::BFloat16 => 2,
            Self::Float32 => 4,
            Self::Float64 => 8,
        }
    }

    /// Width in bits of one element.
    pub const fn bits(&self) -> usize {
        self.bytes() * 8
    }

    pub const fn is_bool(&self) -> bool {
        matches!(self, Self::Bool)
    }

    pub const fn is_signed(&self) -> bool {
        matches!(self, Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64)
    }

    pub const fn is_unsigned(&self) -> bool {
        matches!(self, Self::UInt8 | Self::UInt16 | Self::UInt32 | Self::UInt64)
    }

    pub const fn is_int(&self) -> bool {
        self.is_signed() || self.is_unsigned()
    }

    pub const fn is_float(&self) -> bool {
        matches!(
            self,
            Self::FP8E4M3 | Self::FP8E5M2 | Self::Float16 | Self::BFloat16 | Self::Float32 | Self::Float64
        )
    }

    /// ONNX `TensorProto.DataType` code.
    pub const fn onnx_code(&self) -> i32 {
        *self as i32
    }

    /// Element type for an ONNX `TensorProto.DataType` code.
    ///
    /// Returns `None` for codes without a tensor element type here
    /// (`UNDEFINED`, `STRING`, complex types).
    pub fn from_onnx(code: i32) -> Option<Self> {
        Self::from_repr(code)
    }

    /// ONNX spelling, as printed in model dumps.
    pub const fn onnx_name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt8 => "uint8",
            Self::UInt16 => "uint16",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::FP8E4M3 => "float8e4m3fn",
            Self::FP8E5M2 => "float8e5m2",
            Self::Float16 => "float16",
            Self::BFloat16 => "bfloat16",
            Self::Float32 => "float",
            Self::Float64 => "double",
        }
    }
}

impl std::fmt::Display for ScalarDType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.onnx_name())
    }
}
