//! Rule to flag infinite-shaped loops with no exit or backoff.
//!
//! # Rationale
//!
//! `while True:` around a failing call retries as fast as the CPU allows.
//! When a dependency is down, every client doing this turns into load.
//!
//! # Detected Patterns
//!
//! A `while` / `for` / `do` loop whose condition is empty, `true` or `1`
//! (ignoring parentheses and a trailing `;`), and whose body contains none of:
//!
//! - a `break` or `return`
//! - a call whose callee mentions `sleep`, `backoff`, `delay` or `setTimeout`

use check_this_core::utils::{first_child_of_kind, preorder};
use check_this_core::{
    node_range, Diagnostic, Language, Rule, RuleContext, RuleError, RuleMeta, Severity,
};
use tree_sitter::Node;

/// Rule id for retry.unbounded.
pub const ID: &str = "retry.unbounded";

const META: RuleMeta = RuleMeta {
    default_severity: Severity::Warning,
    tags: &["reliability", "retries"],
    short: "Retry loop lacks limits/backoff",
    long: "Unbounded retries can overload dependencies during outages.",
    docs_url: Some("https://github.com/barthollomew/check-this/blob/main/docs/rules.md#retryunbounded"),
};

const PYTHON_LOOPS: &[&str] = &["while_statement"];
const JS_LOOPS: &[&str] = &["while_statement", "for_statement", "do_statement"];

/// Lowercased callee fragments that count as waiting between attempts.
const BACKOFF_HINTS: &[&str] = &["sleep", "backoff", "delay", "settimeout"];

/// Flags loops that can spin forever without pausing.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryUnbounded;

impl RetryUnbounded {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for RetryUnbounded {
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
        let (loops, message, explanation) = if ctx.language.is_js_family() {
            (
                JS_LOOPS,
                "Potential unbounded retry loop",
                "Add max attempts or backoff to avoid hammering dependencies during failures.",
            )
        } else {
            (
                PYTHON_LOOPS,
                "Retry loop without cap or backoff",
                "Infinite retries can amplify outages; add max attempts and backoff.",
            )
        };

        let mut diagnostics = Vec::new();
        for node in preorder(ctx.root).filter(|n| loops.contains(&n.kind())) {
            let condition = ctx.text_of(node.child_by_field_name("condition"))?;
            if !is_always_true(condition) {
                continue;
            }
            let Some(body) = loop_body(node) else {
                continue;
            };
            if is_bounded(ctx, body)? {
                continue;
            }
            diagnostics.push(
                Diagnostic::new(message, node_range(node)).with_explanation(explanation),
            );
        }
        Ok(diagnostics)
    }
}

fn loop_body(node: Node<'_>) -> Option<Node<'_>> {
    node.child_by_field_name("body")
        .or_else(|| first_child_of_kind(node, &["block", "statement_block"]))
}

/// Whether a loop condition reads as "forever".
fn is_always_true(condition: &str) -> bool {
    let mut text = condition.trim();
    text = text.strip_suffix(';').unwrap_or(text).trim_end();
    while let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        text = inner.trim();
    }
    text.is_empty() || text.eq_ignore_ascii_case("true") || text == "1"
}

/// True if the body can leave the loop or waits between iterations.
fn is_bounded(ctx: &RuleContext<'_>, body: Node<'_>) -> Result<bool, RuleError> {
    for node in preorder(body) {
        match node.kind() {
            "break_statement" | "return_statement" => return Ok(true),
            "call" | "call_expression" => {
                let callee = ctx
                    .text_of(node.child_by_field_name("function"))?
                    .to_lowercase();
                if BACKOFF_HINTS.iter().any(|hint| callee.contains(hint)) {
                    return Ok(true);
                }
            }
            _ => {}
        }
    }
    Ok(false)
}
