//! Diagnostic model: positions, ranges, diagnostics, and the output envelope.

use serde::{Deserialize, Serialize};

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational finding.
    Info,
    /// Finding that should be addressed.
    Warning,
    /// Finding that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A point in the source file.
///
/// Zero-based, in the same coordinate space as tree-sitter points: `line` is
/// the row and `col` the byte column within that row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Zero-based line.
    pub line: usize,
    /// Zero-based byte column.
    pub col: usize,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    /// Converts this position into a byte offset within `source`.
    ///
    /// Positions past the end of a line or of the file are clamped.
    #[must_use]
    pub fn byte_offset(&self, source: &str) -> usize {
        let mut offset = 0;
        for (i, line_content) in source.split('\n').enumerate() {
            if i == self.line {
                return offset + self.col.min(line_content.len());
            }
            offset += line_content.len() + 1;
        }
        source.len()
    }
}

/// A half-open span in the source file: `end` is the first position past it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    /// First position of the span.
    pub start: Position,
    /// First position after the span.
    pub end: Position,
}

impl Range {
    /// Creates a new range.
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// The one-character range at the top of the file, used for findings that
    /// are not tied to a node.
    #[must_use]
    pub const fn file_start() -> Self {
        Self::new(Position::new(0, 0), Position::new(0, 1))
    }

    /// Byte offset and length of this range within `source`.
    #[must_use]
    pub fn byte_span(&self, source: &str) -> (usize, usize) {
        let start = self.start.byte_offset(source);
        let end = self.end.byte_offset(source).max(start);
        (start, end - start)
    }
}

/// A single finding produced by a rule.
///
/// Rules build diagnostics with [`Diagnostic::new`] and the `with_*` methods.
/// Fields a rule leaves blank (`rule_id`, `severity`, `tags`) are filled in by
/// the [`Engine`](crate::Engine) before the diagnostic is returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Dotted rule identifier (e.g., "errors.swallowed").
    pub rule_id: String,
    /// Severity; `None` means "inherit from configuration or the rule default".
    pub severity: Option<Severity>,
    /// Human-readable message.
    pub message: String,
    /// Longer explanation of why this matters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    /// Source range of the offending construct.
    pub range: Range,
    /// Free-form tags (e.g., "reliability").
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Link to documentation for this finding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs_url: Option<String>,
}

impl Diagnostic {
    /// Creates a diagnostic with only a message and a range.
    #[must_use]
    pub fn new(message: impl Into<String>, range: Range) -> Self {
        Self {
            rule_id: String::new(),
            severity: None,
            message: message.into(),
            explanation: None,
            range,
            tags: Vec::new(),
            docs_url: None,
        }
    }

    /// Sets the rule identifier.
    #[must_use]
    pub fn with_rule_id(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_id = rule_id.into();
        self
    }

    /// Sets an explicit per-occurrence severity.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Adds an explanation.
    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    /// Replaces the tags.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Builds an engine-generated `internal.*` diagnostic at the file start.
    pub(crate) fn internal(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(message, Range::file_start())
            .with_rule_id(rule_id)
            .with_severity(Severity::Error)
            .with_tags(["internal"])
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let severity = self.severity.unwrap_or(Severity::Warning);
        write!(
            f,
            "{}:{}: {} [{}] {}",
            self.range.start.line + 1,
            self.range.start.col + 1,
            severity,
            self.rule_id,
            self.message
        )
    }
}

/// Runtime metrics for one analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Milliseconds spent parsing.
    pub parse_ms: u64,
    /// Milliseconds spent running rules.
    pub analyze_ms: u64,
    /// Number of rules that were eligible and executed.
    pub rules_run: usize,
}

/// The JSON envelope returned for one analysis request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    /// Envelope format version.
    pub version: String,
    /// Path of the analyzed file, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Language identifier the source was analyzed as.
    pub language: String,
    /// Diagnostics in rule-registration order, then traversal order.
    pub diagnostics: Vec<Diagnostic>,
    /// Runtime metrics.
    pub stats: Stats,
}

impl Output {
    /// Returns true if any diagnostic is at error severity.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Some(Severity::Error))
    }

    /// Counts diagnostics by severity as `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |s: Severity| {
            self.diagnostics
                .iter()
                .filter(|d| d.severity == Some(s))
                .count()
        };
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output_with(severities: &[Severity]) -> Output {
        Output {
            version: "1.0".to_string(),
            path: None,
            language: "python".to_string(),
            diagnostics: severities
                .iter()
                .map(|s| Diagnostic::new("m", Range::file_start()).with_severity(*s))
                .collect(),
            stats: Stats::default(),
        }
    }

    #[test]
    fn severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
        let parsed: Severity = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(parsed, Severity::Error);
    }

    #[test]
    fn severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn empty_optional_fields_are_omitted() {
        let d = Diagnostic::new("boom", Range::file_start())
            .with_rule_id("errors.swallowed")
            .with_severity(Severity::Warning);
        let value = serde_json::to_value(&d).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("explanation"));
        assert!(!obj.contains_key("tags"));
        assert!(!obj.contains_key("docs_url"));
        assert_eq!(obj["severity"], "warning");
        assert_eq!(obj["range"]["end"]["col"], 1);
    }

    #[test]
    fn output_omits_missing_path() {
        let value = serde_json::to_value(output_with(&[])).unwrap();
        assert!(value.get("path").is_none());
        assert_eq!(value["diagnostics"], serde_json::json!([]));
        assert_eq!(value["stats"]["rules_run"], 0);
    }

    #[test]
    fn byte_offset_walks_lines() {
        let source = "line1\nline2\nline3";
        assert_eq!(Position::new(0, 0).byte_offset(source), 0);
        assert_eq!(Position::new(1, 0).byte_offset(source), 6);
        assert_eq!(Position::new(1, 2).byte_offset(source), 8);
        assert_eq!(Position::new(1, 99).byte_offset(source), 11);
        assert_eq!(Position::new(9, 0).byte_offset(source), source.len());
    }

    #[test]
    fn byte_span_of_range() {
        let source = "abc\ndef\n";
        let range = Range::new(Position::new(1, 0), Position::new(1, 3));
        assert_eq!(range.byte_span(source), (4, 3));
    }

    #[test]
    fn count_by_severity_buckets() {
        let out = output_with(&[Severity::Error, Severity::Info, Severity::Info]);
        assert_eq!(out.count_by_severity(), (1, 0, 2));
        assert!(out.has_errors());
        assert!(!output_with(&[Severity::Warning]).has_errors());
    }
}
