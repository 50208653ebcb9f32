//! Value references (node args).
//!
//! A value is a named slot shared between the output of its producer and the
//! inputs of its consumers. Nodes hold [`ValueId`]s, so an in-place update of
//! the descriptor is observed by every node that references the value.

use std::fmt;

use morph_dtype::{Dim, Shape, TensorType};
use snafu::ensure;

use crate::error::*;

/// Index of a value in its owning graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueId(pub(crate) usize);

impl ValueId {
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// How [`NodeArg::update_type_and_shape`] reconciles an update with the
/// descriptor already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TypeUpdate {
    /// Fail on conflicting ranks or dimensions instead of taking the update.
    pub strict: bool,
    /// Replace the descriptor wholesale, element type included.
    pub override_types: bool,
}

impl TypeUpdate {
    /// Merge shapes, fail on any conflict.
    pub const STRICT: Self = Self { strict: true, override_types: false };
    /// Merge shapes, prefer the update on conflict.
    pub const RELAXED: Self = Self { strict: false, override_types: false };
    /// Replace the descriptor.
    pub const OVERRIDE: Self = Self { strict: true, override_types: true };
}

/// Named, typed value reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeArg {
    id: ValueId,
    name: String,
    ty: Option<TensorType>,
}

impl NodeArg {
    pub(crate) fn new(id: ValueId, name: String, ty: Option<TensorType>) -> Self {
        Self { id, name, ty }
    }

    pub fn id(&self) -> ValueId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type descriptor, if known.
    pub fn ty(&self) -> Option<&TensorType> {
        self.ty.as_ref()
    }

    pub(crate) fn set_type(&mut self, ty: TensorType) {
        self.ty = Some(ty);
    }

    /// Update the descriptor in place.
    ///
    /// Without `override_types` the element type must match and shapes are
    /// merged dimension by dimension: a concrete dimension refines a symbolic
    /// one, and conflicts either fail (`strict`) or resolve to the update.
    pub fn update_type_and_shape(&mut self, update: &TensorType, mode: TypeUpdate) -> Result<()> {
        let Some(existing) = self.ty.as_mut() else {
            self.ty = Some(update.clone());
            return Ok(());
        };

        if mode.override_types {
            if existing != update {
                tracing::debug!(value = %self.name, from = %existing, to = %update, "overriding value type");
            }
            *existing = update.clone();
            return Ok(());
        }

        ensure!(
            existing.elem == update.elem,
            ElementTypeMismatchSnafu { value: self.name.clone(), existing: existing.elem, update: update.elem }
        );

        let merged = match (&existing.shape, &update.shape) {
            (_, None) => return Ok(()),
            (None, Some(new)) => new.clone(),
            (Some(old), Some(new)) => merge_shape(&self.name, old, new, mode.strict)?,
        };
        existing.shape = Some(merged);
        Ok(())
    }
}

fn merge_shape(value: &str, existing: &Shape, update: &Shape, strict: bool) -> Result<Shape> {
    if existing.len() != update.len() {
        ensure!(!strict, ShapeRankMismatchSnafu { value, existing: existing.len(), update: update.len() });
        tracing::warn!(value, existing.rank = existing.len(), update.rank = update.len(), "rank mismatch, taking update");
        return Ok(update.clone());
    }

    existing
        .iter()
        .zip(update.iter())
        .enumerate()
        .map(|(dim, pair)| match pair {
            (Dim::Const(a), Dim::Const(b)) if a != b => {
                ensure!(
                    !strict,
                    ShapeDimMismatchSnafu { value, dim, existing: Dim::Const(*a), update: Dim::Const(*b) }
                );
                tracing::warn!(value, dim, existing = a, update = b, "dimension conflict, taking update");
                Ok(Dim::Const(*b))
            }
            (Dim::Const(a), _) => Ok(Dim::Const(*a)),
            (Dim::Symbolic(_), new) => Ok(new.clone()),
        })
        .collect()
}
