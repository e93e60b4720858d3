//! Rule to flag outbound HTTP calls that never set a timeout.
//!
//! # Rationale
//!
//! A request without a timeout can wait forever on a half-open connection.
//! Under partial outages this exhausts workers and spreads the failure.
//!
//! # Detected Patterns
//!
//! - Python: `requests.*(...)` / `httpx.*(...)` without a `timeout=` keyword
//! - JavaScript/TypeScript: `fetch(url)` without a second argument carrying
//!   a `signal`, `AbortController` or timeout
//! - JavaScript/TypeScript: `axios*(...)` calls whose arguments never
//!   mention `timeout`

use check_this_core::utils::{named_children, preorder};
use check_this_core::{
    node_range, Diagnostic, Language, Rule, RuleContext, RuleError, RuleMeta, Severity,
};
use tree_sitter::Node;

/// Rule id for net.no_timeout.
pub const ID: &str = "net.no_timeout";

const META: RuleMeta = RuleMeta {
    default_severity: Severity::Warning,
    tags: &["reliability", "network"],
    short: "Network call without timeout",
    long: "Network calls without timeouts can hang and block resources during outages.",
    docs_url: Some("https://github.com/barthollomew/check-this/blob/main/docs/rules.md#netno_timeout"),
};

/// Python client modules whose calls accept a `timeout=` keyword.
const PYTHON_CLIENT_PREFIXES: &[&str] = &["requests.", "httpx."];

/// Argument fragments that show a `fetch` call can be cancelled.
const FETCH_CANCEL_HINTS: &[&str] = &["timeout", "AbortController", "signal"];

/// Flags HTTP client calls with no timeout configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetNoTimeout;

impl NetNoTimeout {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for NetNoTimeout {
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
        if ctx.language.is_js_family() {
            check_js(ctx)
        } else {
            check_python(ctx)
        }
    }
}

fn check_python(ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>, RuleError> {
    let mut diagnostics = Vec::new();
    for call in preorder(ctx.root).filter(|n| n.kind() == "call") {
        let callee = ctx.text_of(call.child_by_field_name("function"))?.trim();
        if !PYTHON_CLIENT_PREFIXES.iter().any(|p| callee.starts_with(p)) {
            continue;
        }
        if has_timeout_keyword(ctx, call)? {
            continue;
        }
        diagnostics.push(
            Diagnostic::new("Network call without timeout", node_range(call)).with_explanation(
                "HTTP calls should specify a timeout to avoid hanging during partial outages.",
            ),
        );
    }
    Ok(diagnostics)
}

fn has_timeout_keyword(ctx: &RuleContext<'_>, call: Node<'_>) -> Result<bool, RuleError> {
    let Some(args) = call.child_by_field_name("arguments") else {
        return Ok(false);
    };
    for arg in named_children(args)
        .into_iter()
        .filter(|a| a.kind() == "keyword_argument")
    {
        let name = ctx.text_of(arg.child_by_field_name("name"))?;
        if name == "timeout" || ctx.text(arg)?.trim_start().starts_with("timeout") {
            return Ok(true);
        }
    }
    Ok(false)
}

fn check_js(ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>, RuleError> {
    let mut diagnostics = Vec::new();
    for call in preorder(ctx.root).filter(|n| n.kind() == "call_expression") {
        let callee = ctx.text_of(call.child_by_field_name("function"))?.trim();
        let args = call
            .child_by_field_name("arguments")
            .map(arguments)
            .unwrap_or_default();

        if callee == "fetch" {
            if !fetch_is_cancellable(ctx, &args)? {
                diagnostics.push(
                    Diagnostic::new("fetch call without AbortController/timeout", node_range(call))
                        .with_severity(Severity::Info)
                        .with_explanation(
                            "Provide an AbortController or timeout so fetch calls do not hang indefinitely.",
                        ),
                );
            }
        } else if callee.starts_with("axios") && !axios_sets_timeout(ctx, &args)? {
            diagnostics.push(
                Diagnostic::new("axios call without timeout option", node_range(call))
                    .with_severity(Severity::Info)
                    .with_explanation("Set axios timeouts to avoid hanging requests during outages."),
            );
        }
    }
    Ok(diagnostics)
}

/// Call arguments, minus comments.
fn arguments(args: Node<'_>) -> Vec<Node<'_>> {
    named_children(args)
        .into_iter()
        .filter(|a| a.kind() != "comment")
        .collect()
}

fn fetch_is_cancellable(ctx: &RuleContext<'_>, args: &[Node<'_>]) -> Result<bool, RuleError> {
    if args.len() < 2 {
        return Ok(false);
    }
    for arg in args {
        let text = ctx.text(*arg)?;
        if FETCH_CANCEL_HINTS.iter().any(|hint| text.contains(hint)) {
            return Ok(true);
        }
    }
    Ok(false)
}

fn axios_sets_timeout(ctx: &RuleContext<'_>, args: &[Node<'_>]) -> Result<bool, RuleError> {
    for arg in args {
        if ctx.text(*arg)?.to_lowercase().contains("timeout") {
            return Ok(true);
        }
    }
    Ok(false)
}
