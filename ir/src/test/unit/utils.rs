use test_case::test_case;

use crate::Graph;
use crate::test::helpers::*;
use crate::utils::*;

#[test_case(11, false; "v11")]
#[test_case(12, true; "v12")]
#[test_case(13, true; "v13")]
#[test_case(14, false; "v14")]
fn test_version_gate(version: u32, expected: bool) {
    let mut graph = Graph::new("versions");
    let index = add_versioned_op(&mut graph, "d", "Dropout", version, None, &["x"], &["y"]);
    let node = graph.node(index).unwrap();
    assert_eq!(is_supported_optype_version_and_domain(node, "Dropout", &[12, 13], ONNX_DOMAIN), expected);
}

#[test]
fn test_unresolved_version_never_matches() {
    let mut graph = Graph::new("versions");
    let index = add_op(&mut graph, "d", "Dropout", &["x"], &["y"]);
    let node = graph.node(index).unwrap();
    assert!(!is_supported_optype_version_and_domain(node, "Dropout", &[12, 13], ONNX_DOMAIN));
}

#[test]
fn test_op_type_and_domain_gate() {
    let mut graph = Graph::new("domains");
    let x = graph.value("x");
    let y = graph.value("y");
    let contrib = graph.add_node("d", "Dropout", "", &[x], &[y], None, MS_DOMAIN).unwrap();
    let aliased = graph.add_node("e", "Dropout", "", &[x], &[y], None, ONNX_DOMAIN_ALIAS).unwrap();
    graph.node_mut(contrib).unwrap().set_since_version(13);
    graph.node_mut(aliased).unwrap().set_since_version(13);

    let contrib = graph.node(contrib).unwrap();
    let aliased = graph.node(aliased).unwrap();
    assert!(!is_supported_optype_version_and_domain(contrib, "Dropout", &[13], ONNX_DOMAIN));
    assert!(is_supported_optype_version_and_domain(aliased, "Dropout", &[13], ONNX_DOMAIN));
    assert!(!is_supported_optype_version_and_domain(aliased, "Relu", &[13], ONNX_DOMAIN));
}

#[test_case("", "ai.onnx", true; "default_vs_alias")]
#[test_case("ai.onnx", "", true; "alias_vs_default")]
#[test_case("ai.onnx", "ai.onnx", true; "alias_vs_alias")]
#[test_case(MS_DOMAIN, MS_DOMAIN, true; "contrib_vs_contrib")]
#[test_case(MS_DOMAIN, "", false; "contrib_vs_default")]
#[test_case("ai.onnx", MS_DOMAIN, false; "alias_vs_contrib")]
fn test_domains_match(lhs: &str, rhs: &str, expected: bool) {
    assert_eq!(domains_match(lhs, rhs), expected);
}
