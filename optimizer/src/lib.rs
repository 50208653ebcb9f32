//! Rule-based rewriting of Morph graphs.
//!
//! A [`RewriteRule`] pairs a read-only legality check with a graph mutation
//! and reports what the mutation did as a [`RewriteRuleEffect`]. The
//! [`RuleBasedGraphTransformer`] drives registered rules over a graph.
//!
//! # Module Organization
//!
//! - [`rule`] - The rule trait and rewrite effects
//! - [`rules`] - Concrete rules (Dropout → BitmaskDropout)
//! - [`transformer`] - The rule driver
//! - [`config`] - Driver configuration
//! - [`error`] - Error types and result handling
//!
//! # Example
//!
//! ```rust,ignore
//! use morph_optimizer::{RuleBasedGraphTransformer, TransformerConfig};
//!
//! let transformer = RuleBasedGraphTransformer::with_default_rules("level1", TransformerConfig::from_env())?;
//! let modified = transformer.apply(&mut graph)?;
//! ```

pub mod config;
pub mod error;
pub mod rule;
pub mod rules;
pub mod transformer;

#[cfg(test)]
pub mod test;

pub use config::TransformerConfig;
pub use error::{Error, Result};
pub use rule::{RewriteRule, RewriteRuleEffect};
pub use rules::DropoutBitmaskRewrite;
pub use transformer::RuleBasedGraphTransformer;
