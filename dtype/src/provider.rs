//! Execution provider tags.
//!
//! A node carries the provider that will run it. The graph crates treat the
//! tag as opaque apart from equality; the known variants only exist so rules
//! can name them without string literals.

use std::fmt;
use std::str::FromStr;

use snafu::ensure;

use crate::error::{Error, InvalidProviderSnafu};

/// Backend a node is assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecutionProvider {
    Cpu,
    Cuda,
    Rocm,
    Dml,
    TensorRt,
    /// Provider without a dedicated variant, stored by its registered name.
    Other(String),
}

impl ExecutionProvider {
    pub const CPU_NAME: &'static str = "CPUExecutionProvider";
    pub const CUDA_NAME: &'static str = "CUDAExecutionProvider";
    pub const ROCM_NAME: &'static str = "ROCMExecutionProvider";
    pub const DML_NAME: &'static str = "DmlExecutionProvider";
    pub const TENSORRT_NAME: &'static str = "TensorrtExecutionProvider";

    /// Registered provider name.
    pub fn name(&self) -> &str {
        match self {
            Self::Cpu => Self::CPU_NAME,
            Self::Cuda => Self::CUDA_NAME,
            Self::Rocm => Self::ROCM_NAME,
            Self::Dml => Self::DML_NAME,
            Self::TensorRt => Self::TENSORRT_NAME,
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for ExecutionProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExecutionProvider {
    type Err = Error;

    /// Parse a registered provider name or a short alias.
    ///
    /// Examples:
    /// - "CUDAExecutionProvider" -> ExecutionProvider::Cuda
    /// - "cuda" / "GPU" -> ExecutionProvider::Cuda
    /// - "MyVendorExecutionProvider" -> ExecutionProvider::Other(..)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ensure!(!trimmed.is_empty(), InvalidProviderSnafu { provider: s });
        ensure!(!trimmed.contains(char::is_whitespace), InvalidProviderSnafu { provider: s });

        let provider = match trimmed {
            Self::CPU_NAME => Self::Cpu,
            Self::CUDA_NAME => Self::Cuda,
            Self::ROCM_NAME => Self::Rocm,
            Self::DML_NAME => Self::Dml,
            Self::TENSORRT_NAME => Self::TensorRt,
            other => match other.to_uppercase().as_str() {
                "CPU" => Self::Cpu,
                "CUDA" | "GPU" => Self::Cuda,
                "ROCM" => Self::Rocm,
                "DML" => Self::Dml,
                "TENSORRT" | "TRT" => Self::TensorRt,
                _ => Self::Other(other.to_string()),
            },
        };
        Ok(provider)
    }
}
