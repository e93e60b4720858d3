//! Rule to flag exception handlers that do nothing.
//!
//! # Rationale
//!
//! A handler with an empty body (or only a placeholder such as `pass`) hides
//! the failure entirely. During an outage this is the difference between an
//! alert and silence.
//!
//! # Detected Patterns
//!
//! ```text
//! # Python
//! try:
//!     risky()
//! except Exception:
//!     pass
//!
//! // JavaScript / TypeScript
//! try { risky() } catch (e) {}
//! ```
//!
//! # Good Patterns
//!
//! ```text
//! except Exception:
//!     log.exception("risky failed")
//!     raise
//! ```

use check_this_core::utils::{first_child_of_kind, preorder, statements};
use check_this_core::{
    node_range, Diagnostic, Language, Rule, RuleContext, RuleError, RuleMeta, Severity,
};
use tree_sitter::Node;

/// Rule id for errors.swallowed.
pub const ID: &str = "errors.swallowed";

const META: RuleMeta = RuleMeta {
    default_severity: Severity::Warning,
    tags: &["reliability", "errors"],
    short: "Exceptions caught and ignored",
    long: "Empty error handlers swallow failures and hide outages.",
    docs_url: Some("https://github.com/barthollomew/check-this/blob/main/docs/rules.md#errorsswallowed"),
};

/// Flags `except`/`catch` handlers whose body is empty or a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorsSwallowed;

impl ErrorsSwallowed {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for ErrorsSwallowed {
    fn id(&self) -> &'static str {
        ID
    }

    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn supports(&self, language: Language) -> bool {
        matches!(
            language,
            Language::Python | Language::JavaScript | Language::TypeScript
        )
    }

    fn run(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>, RuleError> {
        let diagnostics = if ctx.language.is_js_family() {
            check_js(ctx)
        } else {
            check_python(ctx)
        };
        Ok(diagnostics)
    }
}

fn check_python(ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
    preorder(ctx.root)
        .filter(|n| matches!(n.kind(), "except_clause" | "except_group_clause"))
        .filter(|handler| {
            first_child_of_kind(*handler, &["block"]).map_or(true, is_noop_block)
        })
        .map(|handler| {
            Diagnostic::new("Exception handled but nothing done", node_range(handler))
                .with_explanation(
                    "Swallowing exceptions makes outages harder to detect; log or re-raise instead.",
                )
        })
        .collect()
}

fn check_js(ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
    preorder(ctx.root)
        .filter(|n| n.kind() == "catch_clause")
        .filter(|handler| {
            handler
                .child_by_field_name("body")
                .or_else(|| first_child_of_kind(*handler, &["statement_block"]))
                .map_or(true, is_noop_block)
        })
        .map(|handler| {
            Diagnostic::new("Empty catch block swallows errors", node_range(handler))
                .with_explanation(
                    "Unhandled errors disappear silently; handle or log the failure path.",
                )
        })
        .collect()
}

/// True if `block` has no statements, or only placeholder statements.
fn is_noop_block(block: Node<'_>) -> bool {
    statements(block).into_iter().all(is_placeholder)
}

/// `pass`, a bare `...`, or a lone `;`.
fn is_placeholder(stmt: Node<'_>) -> bool {
    match stmt.kind() {
        "pass_statement" | "empty_statement" => true,
        "expression_statement" => {
            stmt.named_child_count() == 1
                && first_child_of_kind(stmt, &["ellipsis"]).is_some()
        }
        _ => false,
    }
}
