//! Engine that orchestrates parsing, rule execution, and suppression handling.

use std::time::Instant;

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::context::RuleContext;
use crate::language::{Language, TreeProducer, TreeSitterProducer, UnsupportedLanguage};
use crate::rule::{Rule, RuleBox};
use crate::suppression::SuppressionIndex;
use crate::types::{Diagnostic, Output, Stats};

/// Envelope version used when a request does not set one.
pub const DEFAULT_VERSION: &str = "1.0";

/// Rule id of the diagnostic emitted when the source cannot be parsed.
pub const PARSE_ERROR_ID: &str = "internal.parse_error";

/// Errors that make a request unfit for analysis.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// No language was given or detected.
    #[error("language is required")]
    MissingLanguage,

    /// The language has no tree producer.
    #[error(transparent)]
    Unsupported(#[from] UnsupportedLanguage),
}

/// A request to analyze one source buffer.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeRequest {
    /// Path reported in the output envelope.
    pub path: Option<String>,
    /// Language identifier (e.g., "python").
    pub language: Option<String>,
    /// Raw source bytes.
    pub source: Vec<u8>,
    /// Rule configuration for this request.
    pub config: Config,
    /// Envelope version; blank means [`DEFAULT_VERSION`].
    pub version: Option<String>,
}

impl AnalyzeRequest {
    /// Creates a request for `source` in `language`.
    #[must_use]
    pub fn new(language: impl Into<String>, source: impl Into<Vec<u8>>) -> Self {
        Self {
            language: Some(language.into()),
            source: source.into(),
            ..Self::default()
        }
    }

    /// Sets the path reported in the envelope.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the rule configuration.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Sets the envelope version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Checks that the request names a supported language.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the language is missing or unsupported.
    pub fn validate(self) -> Result<ValidatedRequest, ValidationError> {
        let language = self
            .language
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .ok_or(ValidationError::MissingLanguage)?
            .parse::<Language>()?;
        Ok(ValidatedRequest {
            request: self,
            language,
        })
    }
}

/// A request that passed [`AnalyzeRequest::validate`].
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    request: AnalyzeRequest,
    language: Language,
}

impl ValidatedRequest {
    /// The resolved language.
    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    /// The underlying request.
    #[must_use]
    pub fn request(&self) -> &AnalyzeRequest {
        &self.request
    }
}

/// Builder for configuring an [`Engine`].
#[derive(Default)]
pub struct EngineBuilder {
    rules: Vec<RuleBox>,
    producer: Option<Box<dyn TreeProducer>>,
}

impl EngineBuilder {
    /// Creates a new builder with no rules and the tree-sitter producer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rule. Rules run in registration order.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Registers a boxed rule.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Registers several boxed rules, keeping their order.
    #[must_use]
    pub fn rules<I: IntoIterator<Item = RuleBox>>(mut self, rules: I) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Replaces the tree producer.
    #[must_use]
    pub fn producer<P: TreeProducer + 'static>(mut self, producer: P) -> Self {
        self.producer = Some(Box::new(producer));
        self
    }

    /// Builds the engine.
    #[must_use]
    pub fn build(self) -> Engine {
        Engine {
            rules: self.rules,
            producer: self
                .producer
                .unwrap_or_else(|| Box::new(TreeSitterProducer)),
        }
    }
}

/// Runs registered rules over one source buffer at a time.
///
/// The engine holds no per-request state, so one instance can serve
/// concurrent [`analyze`](Self::analyze) calls from several threads.
pub struct Engine {
    rules: Vec<RuleBox>,
    producer: Box<dyn TreeProducer>,
}

impl Engine {
    /// Creates a new builder for configuring an engine.
    #[must_use]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Registered rules, in execution order.
    #[must_use]
    pub fn rules(&self) -> &[RuleBox] {
        &self.rules
    }

    /// Analyzes one validated request.
    ///
    /// Parse failures and rule failures are reported as `internal.*`
    /// diagnostics inside the returned envelope; they never abort the call.
    #[must_use]
    pub fn analyze(&self, validated: &ValidatedRequest) -> Output {
        let request = validated.request();
        let language = validated.language();

        let mut out = Output {
            version: request
                .version
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(DEFAULT_VERSION)
                .to_string(),
            path: request.path.clone(),
            language: language.id().to_string(),
            diagnostics: Vec::new(),
            stats: Stats::default(),
        };

        if String::from_utf8_lossy(&request.source).trim().is_empty() {
            debug!("Source is empty, skipping analysis");
            return out;
        }

        let parse_start = Instant::now();
        let parsed = self.producer.parse(language, &request.source);
        out.stats.parse_ms = elapsed_ms(parse_start);

        let tree = match parsed {
            Ok(tree) => tree,
            Err(err) => {
                warn!("Failed to parse {} source: {}", language, err);
                out.diagnostics.push(
                    Diagnostic::internal(PARSE_ERROR_ID, format!("parse error: {err}"))
                        .with_explanation(
                            "The analyzer could not parse this file; results may be incomplete.",
                        ),
                );
                return out;
            }
        };

        let suppressions = SuppressionIndex::extract(&request.source);
        let ctx = RuleContext::new(language, tree.root_node(), &request.source);

        let analyze_start = Instant::now();
        for rule in &self.rules {
            let id = rule.id();
            if !request.config.is_rule_enabled(id) {
                debug!("Skipping disabled rule: {}", id);
                continue;
            }
            if !rule.supports(language) {
                debug!("Skipping rule {} for unsupported language {}", id, language);
                continue;
            }

            out.stats.rules_run += 1;
            match rule.run(&ctx) {
                Ok(diagnostics) => {
                    let before = out.diagnostics.len();
                    out.diagnostics.extend(diagnostics.into_iter().filter_map(|d| {
                        resolve(rule.as_ref(), d, &request.config, &suppressions)
                    }));
                    debug!(
                        "Rule {} produced {} diagnostic(s)",
                        id,
                        out.diagnostics.len() - before
                    );
                }
                Err(err) => {
                    warn!("Rule {} failed: {}", id, err);
                    out.diagnostics.push(Diagnostic::internal(
                        format!("internal.{id}"),
                        format!("rule {id} failed: {err}"),
                    ));
                }
            }
        }
        out.stats.analyze_ms = elapsed_ms(analyze_start);

        out
    }
}

/// Applies suppression and defaulting to one diagnostic from `rule`.
///
/// Returns `None` if the diagnostic is suppressed.
fn resolve(
    rule: &dyn Rule,
    mut diagnostic: Diagnostic,
    config: &Config,
    suppressions: &SuppressionIndex,
) -> Option<Diagnostic> {
    if diagnostic.rule_id.is_empty() {
        diagnostic.rule_id = rule.id().to_string();
    }
    if suppressions.is_suppressed(&diagnostic.rule_id, diagnostic.range.start.line) {
        return None;
    }

    let meta = rule.meta();
    diagnostic.severity = Some(
        config
            .rule_severity(&diagnostic.rule_id)
            .or(diagnostic.severity)
            .unwrap_or(meta.default_severity),
    );
    if diagnostic.tags.is_empty() {
        diagnostic.tags = meta.tags.iter().map(|t| (*t).to_string()).collect();
    }
    if diagnostic.docs_url.is_none() {
        diagnostic.docs_url = meta.docs_url.map(str::to_string);
    }
    Some(diagnostic)
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
