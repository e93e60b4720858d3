//! Built-in rule registry.

use crate::{ErrorsSwallowed, GlobalMutableState, NetNoTimeout, RetryUnbounded};
use check_this_core::{Engine, RuleBox};

/// Returns every built-in rule, in execution order.
///
/// Order matters: diagnostics in an [`Output`](check_this_core::Output) are
/// grouped by rule in this sequence.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![
        Box::new(ErrorsSwallowed::new()),
        Box::new(NetNoTimeout::new()),
        Box::new(RetryUnbounded::new()),
        Box::new(GlobalMutableState::new()),
    ]
}

/// Builds an [`Engine`] with [`all_rules`] and the tree-sitter parser.
#[must_use]
pub fn default_engine() -> Engine {
    let rules = all_rules();
    tracing::debug!(count = rules.len(), "registering built-in rules");
    Engine::builder().rules(rules).build()
}
