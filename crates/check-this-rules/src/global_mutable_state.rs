//! Rule to flag module-level bindings initialised with mutable containers.
//!
//! Only top-level statements are inspected; anything nested in a function
//! or class body is out of scope.
//!
//! # Detected Patterns
//!
//! ```text
//! CACHE = {}                  # Python dict/list/set literal or comprehension
//! export const registry = []; // JS/TS object or array literal
//! ```

use check_this_core::utils::named_children;
use check_this_core::{
    node_range, Diagnostic, Language, Rule, RuleContext, RuleError, RuleMeta, Severity,
};
use tree_sitter::Node;

/// Rule id for state.global_mutable.
pub const ID: &str = "state.global_mutable";

const META: RuleMeta = RuleMeta {
    default_severity: Severity::Info,
    tags: &["state"],
    short: "Global mutable state",
    long: "Global mutable state can lead to hidden coupling and race conditions.",
    docs_url: Some("https://github.com/barthollomew/check-this/blob/main/docs/rules.md#stateglobal_mutable"),
};

const PYTHON_CONTAINERS: &[&str] = &[
    "list",
    "dictionary",
    "set",
    "list_comprehension",
    "dictionary_comprehension",
    "set_comprehension",
];

const JS_CONTAINERS: &[&str] = &["object", "array"];

/// Flags global variables holding lists, dicts, objects and the like.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalMutableState;

impl GlobalMutableState {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for GlobalMutableState {
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
    for stmt in named_children(ctx.root)
        .into_iter()
        .filter(|n| n.kind() == "expression_statement")
    {
        let mut flagged = false;
        for assignment in named_children(stmt)
            .into_iter()
            .filter(|n| n.kind() == "assignment")
        {
            if let Some(value) = assigned_value(assignment) {
                flagged |= is_container(ctx, value, PYTHON_CONTAINERS)?;
            }
        }
        if flagged {
            diagnostics.push(
                Diagnostic::new("Module-level mutable state", node_range(stmt))
                    .with_severity(Severity::Info)
                    .with_explanation(
                        "Global mutable collections can be shared implicitly across imports. Consider scoping within functions or using immutables.",
                    ),
            );
        }
    }
    Ok(diagnostics)
}

/// Right-hand side of `a = b = value`, following chained assignments.
fn assigned_value(mut assignment: Node<'_>) -> Option<Node<'_>> {
    loop {
        let right = assignment.child_by_field_name("right")?;
        if right.kind() != "assignment" {
            return Some(right);
        }
        assignment = right;
    }
}

fn check_js(ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>, RuleError> {
    let mut diagnostics = Vec::new();
    for stmt in named_children(ctx.root) {
        let decl = if stmt.kind() == "export_statement" {
            match stmt.child_by_field_name("declaration") {
                Some(decl) => decl,
                None => continue,
            }
        } else {
            stmt
        };
        if !matches!(decl.kind(), "lexical_declaration" | "variable_declaration") {
            continue;
        }
        for declarator in named_children(decl)
            .into_iter()
            .filter(|n| n.kind() == "variable_declarator")
        {
            let Some(value) = declarator.child_by_field_name("value") else {
                continue;
            };
            if is_container(ctx, value, JS_CONTAINERS)? {
                diagnostics.push(
                    Diagnostic::new("Module-level mutable state", node_range(declarator))
                        .with_severity(Severity::Info)
                        .with_explanation(
                            "Globals that hold mutable objects are easily shared across imports; prefer local scopes or factories.",
                        ),
                );
            }
        }
    }
    Ok(diagnostics)
}

fn is_container(ctx: &RuleContext<'_>, value: Node<'_>, kinds: &[&str]) -> Result<bool, RuleError> {
    if kinds.contains(&value.kind()) {
        return Ok(true);
    }
    let text = ctx.text(value)?.trim();
    // `{...} as const` is frozen at the type level.
    if text.ends_with("as const") {
        return Ok(false);
    }
    Ok(text.starts_with('[') || text.starts_with('{'))
}
