//! Rule driver.
//!
//! [`RuleBasedGraphTransformer`] walks the graph in topological order and
//! offers every node to the rules registered for its operator type. Passes
//! repeat until one changes nothing or the configured step limit is reached.
//!
//! Rules run one at a time with exclusive access to the graph. A node removed
//! by a rule is not offered to the remaining rules; nodes a rule adds are seen
//! on the next pass.

use std::collections::HashMap;
use std::fmt;

use morph_ir::{Graph, NodeIndex};
use snafu::{ResultExt, ensure};

use crate::config::TransformerConfig;
use crate::error::*;
use crate::rule::{RewriteRule, RewriteRuleEffect};

pub struct RuleBasedGraphTransformer {
    name: String,
    config: TransformerConfig,
    rules: Vec<Box<dyn RewriteRule>>,
    /// Rule indices keyed by target operator type.
    by_op_type: HashMap<String, Vec<usize>>,
    /// Rules without target operator types.
    any_op: Vec<usize>,
}

impl RuleBasedGraphTransformer {
    pub fn new(name: impl Into<String>, config: TransformerConfig) -> Self {
        Self { name: name.into(), config, rules: Vec::new(), by_op_type: HashMap::new(), any_op: Vec::new() }
    }

    /// Transformer with every rule from [`crate::rules::default_rules`].
    pub fn with_default_rules(name: impl Into<String>, config: TransformerConfig) -> Result<Self> {
        let mut transformer = Self::new(name, config);
        for rule in crate::rules::default_rules() {
            transformer.register(rule)?;
        }
        Ok(transformer)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &TransformerConfig {
        &self.config
    }

    /// Register a rule.
    ///
    /// Returns `false` if the configuration disables the rule. Registering two
    /// rules with the same name is an error.
    pub fn register(&mut self, rule: Box<dyn RewriteRule>) -> Result<bool> {
        let name = rule.name().to_string();
        ensure!(!self.rules.iter().any(|r| r.name() == name), DuplicateRuleSnafu { name });

        if self.config.is_rule_disabled(&name) {
            tracing::debug!(transformer = %self.name, rule = %name, "rule disabled by configuration");
            return Ok(false);
        }

        let index = self.rules.len();
        let targets = rule.target_op_types();
        if targets.is_empty() {
            self.any_op.push(index);
        } else {
            for op_type in targets {
                self.by_op_type.entry(op_type.to_string()).or_default().push(index);
            }
        }
        self.rules.push(rule);
        tracing::trace!(transformer = %self.name, rule = %name, "rule registered");
        Ok(true)
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Rules offered nodes of `op_type`, in registration order.
    pub fn rules_for(&self, op_type: &str) -> impl Iterator<Item = &dyn RewriteRule> {
        self.rule_indices(op_type).into_iter().map(move |index| -> &dyn RewriteRule { self.rules[index].as_ref() })
    }

    fn rule_indices(&self, op_type: &str) -> Vec<usize> {
        let mut indices: Vec<usize> =
            self.by_op_type.get(op_type).into_iter().flatten().chain(&self.any_op).copied().collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// Run the registered rules over `graph`.
    ///
    /// Returns whether anything changed. An error from a rule aborts the run;
    /// the graph may then be partially rewritten and should not be used.
    #[tracing::instrument(skip_all, fields(transformer = %self.name, graph = graph.name()))]
    pub fn apply(&self, graph: &mut Graph) -> Result<bool> {
        if self.config.disabled {
            tracing::debug!("optimizer disabled, skipping");
            return Ok(false);
        }
        if self.rules.is_empty() {
            return Ok(false);
        }

        let mut modified = false;
        for step in 0..self.config.steps {
            let changed = self
                .apply_pass(graph)
                .inspect_err(|error| tracing::error!(step, %error, "rewrite pass aborted"))?;
            if !changed {
                tracing::trace!(step, "fixed point reached");
                break;
            }
            modified = true;
            graph.resolve().context(ResolveSnafu { step })?;
            tracing::debug!(step, nodes = graph.node_count(), edges = graph.edge_count(), "pass modified graph");
        }
        Ok(modified)
    }

    fn apply_pass(&self, graph: &mut Graph) -> Result<bool> {
        let mut changed = false;
        for index in graph.topological_order() {
            let Some(node) = graph.node(index) else { continue };
            if !self.config.is_provider_compatible(node.execution_provider()) {
                continue;
            }

            for rule_index in self.rule_indices(node.op_type()) {
                let rule = &self.rules[rule_index];
                let effect = rule.check_condition_and_apply(graph, index)?;
                if effect.is_modified() {
                    changed = true;
                    log_effect(rule.name(), index, effect);
                }
                if effect.is_removed() {
                    break;
                }
            }
        }
        Ok(changed)
    }
}

fn log_effect(rule: &str, node: NodeIndex, effect: RewriteRuleEffect) {
    tracing::trace!(rule, node = %node, ?effect, "rule applied");
}

impl fmt::Debug for RuleBasedGraphTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleBasedGraphTransformer")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("rules", &self.rules.iter().map(|r| r.name()).collect::<Vec<_>>())
            .finish()
    }
}
