//! Transformer configuration.
//!
//! Typed configuration for [`RuleBasedGraphTransformer`](crate::RuleBasedGraphTransformer)
//! with a bon builder and environment variable fallbacks. The tables each rule
//! checks (operator versions, providers) are constants of the rule, not
//! configuration.

use bon::bon;
use morph_dtype::ExecutionProvider;

pub const STEPS_VAR: &str = "MORPH_TRANSFORMER_STEPS";
pub const DISABLED_RULES_VAR: &str = "MORPH_DISABLED_RULES";
pub const DISABLE_OPTIMIZER_VAR: &str = "MORPH_DISABLE_OPTIMIZER";
pub const COMPATIBLE_PROVIDERS_VAR: &str = "MORPH_COMPATIBLE_PROVIDERS";

const DEFAULT_STEPS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformerConfig {
    /// Maximum number of passes over the graph.
    pub steps: usize,
    /// Rule names that are not registered.
    pub disabled_rules: Vec<String>,
    /// Providers whose nodes are offered to rules. Empty means every node.
    pub compatible_providers: Vec<ExecutionProvider>,
    /// Skip all rewrites.
    pub disabled: bool,
}

impl Default for TransformerConfig {
    fn default() -> Self {
        Self { steps: DEFAULT_STEPS, disabled_rules: Vec::new(), compatible_providers: Vec::new(), disabled: false }
    }
}

#[bon]
impl TransformerConfig {
    /// Create a transformer configuration with builder pattern.
    #[builder]
    pub fn builder(
        #[builder(default = DEFAULT_STEPS)] steps: usize,
        #[builder(default)] disabled_rules: Vec<String>,
        #[builder(default)] compatible_providers: Vec<ExecutionProvider>,
        #[builder(default = false)] disabled: bool,
    ) -> Self {
        Self { steps, disabled_rules, compatible_providers, disabled }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// * `MORPH_TRANSFORMER_STEPS` - Maximum passes over the graph (default: 10)
    /// * `MORPH_DISABLED_RULES` - Comma-separated rule names to skip
    /// * `MORPH_DISABLE_OPTIMIZER` - Disable all rewrites if set
    /// * `MORPH_COMPATIBLE_PROVIDERS` - Comma-separated providers whose nodes are rewritten
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with a custom variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let steps = var(STEPS_VAR).and_then(|s| s.trim().parse().ok()).unwrap_or(DEFAULT_STEPS);
        let disabled_rules: Vec<String> =
            var(DISABLED_RULES_VAR).map(|s| split_list(&s).map(str::to_string).collect()).unwrap_or_default();
        let disabled = var(DISABLE_OPTIMIZER_VAR).is_some();
        let compatible_providers: Vec<ExecutionProvider> = var(COMPATIBLE_PROVIDERS_VAR)
            .map(|s| {
                split_list(&s)
                    .filter_map(|entry| match entry.parse::<ExecutionProvider>() {
                        Ok(provider) => Some(provider),
                        Err(error) => {
                            tracing::warn!(%error, var = COMPATIBLE_PROVIDERS_VAR, "ignoring provider entry");
                            None
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self { steps, disabled_rules, compatible_providers, disabled }
    }

    /// Check if a rule with this name should be skipped.
    pub fn is_rule_disabled(&self, name: &str) -> bool {
        self.disabled_rules.iter().any(|rule| rule == name)
    }

    /// Check if nodes assigned to `provider` are offered to rules.
    ///
    /// Unassigned nodes only pass when no restriction is configured.
    pub fn is_provider_compatible(&self, provider: Option<&ExecutionProvider>) -> bool {
        self.compatible_providers.is_empty() || provider.is_some_and(|p| self.compatible_providers.contains(p))
    }
}

fn split_list(s: &str) -> impl Iterator<Item = &str> {
    s.split(',').map(str::trim).filter(|entry| !entry.is_empty())
}
