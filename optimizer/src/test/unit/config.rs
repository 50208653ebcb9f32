use std::collections::HashMap;

use morph_dtype::ExecutionProvider;
use test_case::test_case;

use crate::config::*;

fn from_map(vars: &[(&str, &str)]) -> TransformerConfig {
    let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    TransformerConfig::from_vars(|key| vars.get(key).cloned())
}

#[test]
fn test_default() {
    let config = TransformerConfig::default();
    assert_eq!(config.steps, 10);
    assert!(config.disabled_rules.is_empty());
    assert!(config.compatible_providers.is_empty());
    assert!(!config.disabled);
}

#[test]
fn test_builder_matches_default() {
    assert_eq!(TransformerConfig::builder().build(), TransformerConfig::default());
}

#[test]
fn test_builder() {
    let config = TransformerConfig::builder()
        .steps(3)
        .disabled_rules(vec!["A".to_string()])
        .compatible_providers(vec![ExecutionProvider::Cuda])
        .build();
    assert_eq!(config.steps, 3);
    assert!(config.is_rule_disabled("A"));
    assert!(!config.is_rule_disabled("B"));
    assert_eq!(config.compatible_providers, vec![ExecutionProvider::Cuda]);
    assert!(!config.disabled);
}

#[test]
fn test_from_vars_empty() {
    assert_eq!(from_map(&[]), TransformerConfig::default());
}

#[test]
#[tracing_test::traced_test]
fn test_from_vars() {
    let config = from_map(&[
        (STEPS_VAR, " 3 "),
        (DISABLED_RULES_VAR, " A, B ,,"),
        (DISABLE_OPTIMIZER_VAR, "1"),
        (COMPATIBLE_PROVIDERS_VAR, "cuda, not a provider ,CPUExecutionProvider"),
    ]);
    assert_eq!(config.steps, 3);
    assert_eq!(config.disabled_rules, vec!["A", "B"]);
    assert!(config.disabled);
    assert_eq!(config.compatible_providers, vec![ExecutionProvider::Cuda, ExecutionProvider::Cpu]);
    assert!(logs_contain("ignoring provider entry"));
}

#[test_case("abc"; "not a number")]
#[test_case("-1"; "negative")]
#[test_case(""; "empty")]
fn test_from_vars_invalid_steps(value: &str) {
    assert_eq!(from_map(&[(STEPS_VAR, value)]).steps, 10);
}

#[test_case(&[], None, true; "unrestricted unassigned")]
#[test_case(&[], Some(ExecutionProvider::Rocm), true; "unrestricted")]
#[test_case(&[ExecutionProvider::Cuda], Some(ExecutionProvider::Cuda), true; "listed")]
#[test_case(&[ExecutionProvider::Cuda], Some(ExecutionProvider::Cpu), false; "not listed")]
#[test_case(&[ExecutionProvider::Cuda], None, false; "restricted unassigned")]
fn test_provider_compatibility(allowed: &[ExecutionProvider], provider: Option<ExecutionProvider>, expected: bool) {
    let config = TransformerConfig::builder().compatible_providers(allowed.to_vec()).build();
    assert_eq!(config.is_provider_compatible(provider.as_ref()), expected);
}
