use crate::*;
use proptest::prelude::*;

pub fn int_dtype() -> impl Strategy<Value = ScalarDType> {
    prop_oneof![
        Just(ScalarDType::Int8),
        Just(ScalarDType::Int16),
        Just(ScalarDType::Int32),
        Just(ScalarDType::Int64),
        Just(ScalarDType::UInt8),
        Just(ScalarDType::UInt16),
        Just(ScalarDType::UInt32),
        Just(ScalarDType::UInt64),
    ]
}

pub fn float_dtype() -> impl Strategy<Value = ScalarDType> {
    prop_oneof![
        Just(ScalarDType::FP8E4M3),
        Just(ScalarDType::FP8E5M2),
        Just(ScalarDType::Float16),
        Just(ScalarDType::BFloat16),
        Just(ScalarDType::Float32),
        Just(ScalarDType::Float64)
    ]
}

pub fn scalar_generator() -> impl Strategy<Value = ScalarDType> {
    prop_oneof![Just(ScalarDType::Bool), int_dtype(), float_dtype()]
}

/// Concrete dimension in a small range so element counts stay readable.
pub fn const_dim() -> impl Strategy<Value = Dim> {
    (0usize..=96).prop_map(Dim::Const)
}

pub fn any_dim() -> impl Strategy<Value = Dim> {
    prop_oneof![
        4 => const_dim(),
        1 => prop_oneof![Just("batch"), Just("seq_len"), Just("heads")].prop_map(Dim::symbolic),
    ]
}

pub fn static_tensor_type() -> impl Strategy<Value = TensorType> {
    (scalar_generator(), prop::collection::vec(const_dim(), 0..4))
        .prop_map(|(elem, dims)| TensorType::with_shape(elem, dims))
}

pub fn tensor_type() -> impl Strategy<Value = TensorType> {
    (scalar_generator(), prop::option::of(prop::collection::vec(any_dim(), 0..4))).prop_map(|(elem, dims)| match dims {
        Some(dims) => TensorType::with_shape(elem, dims),
        None => TensorType::new(elem),
    })
}
