//! Node predicates shared by optimizer rules.

use crate::node::Node;

/// Default ONNX operator domain.
pub const ONNX_DOMAIN: &str = "";
/// Alternate spelling of the default ONNX domain.
pub const ONNX_DOMAIN_ALIAS: &str = "ai.onnx";
/// Domain of the Microsoft contrib operators.
pub const MS_DOMAIN: &str = "com.microsoft";

/// Check if two domain strings name the same operator set.
pub fn domains_match(lhs: &str, rhs: &str) -> bool {
    fn canonical(domain: &str) -> &str {
        if domain == ONNX_DOMAIN_ALIAS { ONNX_DOMAIN } else { domain }
    }
    canonical(lhs) == canonical(rhs)
}

/// Check if `node` is `op_type` from `domain`, resolved against one of `versions`.
///
/// A node without a resolved schema version never matches.
pub fn is_supported_optype_version_and_domain(node: &Node, op_type: &str, versions: &[u32], domain: &str) -> bool {
    node.op_type() == op_type
        && domains_match(node.domain(), domain)
        && node.since_version().is_some_and(|v| versions.contains(&v))
}
