//! Concrete rewrite rules.

pub mod dropout_bitmask;

pub use dropout_bitmask::DropoutBitmaskRewrite;

use crate::rule::RewriteRule;

/// Every rule shipped with this crate, in registration order.
pub fn default_rules() -> Vec<Box<dyn RewriteRule>> {
    vec![Box::new(DropoutBitmaskRewrite::new())]
}
