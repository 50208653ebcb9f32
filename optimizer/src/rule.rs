//! Rewrite rule abstraction.
//!
//! A rule is a pair of a read-only legality check and a graph mutation. The
//! driver calls [`RewriteRule::satisfy_condition`] first and only calls
//! [`RewriteRule::apply`] on a node that passed the check in the same graph
//! state. Normal rejections are a `false` from the check; errors from `apply`
//! are invariant violations and abort the pass.

use morph_ir::{Graph, Node, NodeIndex};

use crate::error::Result;

/// Structural outcome of [`RewriteRule::apply`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RewriteRuleEffect {
    /// Nothing changed.
    #[default]
    None,
    /// The node was modified in place and is still present.
    UpdatedCurrentNode,
    /// The node is gone; another node may now carry its role.
    RemovedCurrentNode,
    /// The node is untouched but other parts of the graph changed.
    ModifiedRestOfGraph,
}

impl RewriteRuleEffect {
    /// Check if the graph changed.
    pub fn is_modified(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Check if the node the rule was applied to no longer exists.
    pub fn is_removed(self) -> bool {
        matches!(self, Self::RemovedCurrentNode)
    }
}

/// A single graph rewrite.
pub trait RewriteRule: Send + Sync {
    /// Unique name, used for registration and in diagnostics.
    fn name(&self) -> &str;

    /// Operator types this rule is offered. Empty means every node.
    fn target_op_types(&self) -> &[&'static str] {
        &[]
    }

    /// Read-only legality check.
    fn satisfy_condition(&self, graph: &Graph, node: &Node) -> bool;

    /// Mutate the graph. The node must have passed [`Self::satisfy_condition`].
    fn apply(&self, graph: &mut Graph, node: NodeIndex) -> Result<RewriteRuleEffect>;

    /// Run the check and, if it passes, the rewrite.
    fn check_condition_and_apply(&self, graph: &mut Graph, node: NodeIndex) -> Result<RewriteRuleEffect> {
        let Some(candidate) = graph.node(node) else {
            return Ok(RewriteRuleEffect::None);
        };
        let targets = self.target_op_types();
        if !targets.is_empty() && !targets.contains(&candidate.op_type()) {
            return Ok(RewriteRuleEffect::None);
        }
        if !self.satisfy_condition(graph, candidate) {
            return Ok(RewriteRuleEffect::None);
        }

        tracing::debug!(rule = self.name(), node.index = %node, node.name = candidate.name(), "applying rewrite rule");
        self.apply(graph, node)
    }
}
