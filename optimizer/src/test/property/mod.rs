//! Property-based tests for the Dropout rewrite.
//!
//! Random chains mixing Relu and Dropout nodes with varying versions,
//! providers, mask usage and fan-out.

mod rewrite_props;
