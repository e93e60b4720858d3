//! Rule trait for defining detectors.

use thiserror::Error;

use crate::context::RuleContext;
use crate::language::Language;
use crate::types::{Diagnostic, Severity};

/// Static metadata describing a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMeta {
    /// Severity used when neither configuration nor the rule sets one.
    pub default_severity: Severity,
    /// Tags applied to diagnostics that carry none.
    pub tags: &'static [&'static str],
    /// One-line summary.
    pub short: &'static str,
    /// Longer description.
    pub long: &'static str,
    /// Documentation link applied to diagnostics that carry none.
    pub docs_url: Option<&'static str>,
}

/// Internal failure of a rule while analyzing a tree.
#[derive(Debug, Error)]
pub enum RuleError {
    /// A node covered bytes that are not valid UTF-8.
    #[error("invalid UTF-8 in {kind} node at line {line}: {source}")]
    InvalidUtf8 {
        /// Kind of the offending node.
        kind: &'static str,
        /// Zero-based line of the node.
        line: usize,
        /// Underlying decoding error.
        #[source]
        source: std::str::Utf8Error,
    },

    /// The tree did not have the shape the rule expected.
    #[error("unexpected tree shape: {0}")]
    Malformed(String),
}

/// A single detector for one anti-pattern.
///
/// Rules are stateless: the same instance may be run against many trees,
/// from many threads. A rule must not panic on malformed or partial trees;
/// failures are returned as [`RuleError`] and the engine turns them into an
/// `internal.<id>` diagnostic without stopping the other rules.
///
/// # Example
///
/// ```ignore
/// use check_this_core::{Diagnostic, Language, Rule, RuleContext, RuleError, RuleMeta, Severity};
///
/// pub struct NoEval;
///
/// const META: RuleMeta = RuleMeta {
///     default_severity: Severity::Warning,
///     tags: &["security"],
///     short: "eval() call",
///     long: "eval executes arbitrary code.",
///     docs_url: None,
/// };
///
/// impl Rule for NoEval {
///     fn id(&self) -> &'static str { "security.eval" }
///     fn meta(&self) -> &'static RuleMeta { &META }
///     fn supports(&self, language: Language) -> bool { language.is_js_family() }
///     fn run(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>, RuleError> {
///         Ok(Vec::new())
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Stable dotted identifier (e.g., "errors.swallowed"), used for
    /// configuration, suppression, and default tagging.
    fn id(&self) -> &'static str;

    /// Static metadata for this rule.
    fn meta(&self) -> &'static RuleMeta;

    /// Whether this rule can analyze `language`. Unsupported languages are
    /// skipped, not reported.
    fn supports(&self, language: Language) -> bool;

    /// Runs the rule against one parsed file.
    ///
    /// # Errors
    ///
    /// Returns a [`RuleError`] if the rule could not complete.
    fn run(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>, RuleError>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
