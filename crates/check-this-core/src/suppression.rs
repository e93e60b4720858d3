//! Inline suppression markers.
//!
//! Two markers are recognized anywhere on a line, whatever the comment syntax
//! of the analyzed language:
//!
//! ```text
//! # check-this: disable=errors.swallowed, net.no_timeout
//! // check-this: disable-line=retry.unbounded
//! ```
//!
//! `disable=` silences the listed rules for the whole file, including lines
//! before the marker. `disable-line=` silences them on the marker's line only.

use std::collections::{BTreeSet, HashMap};

/// Marker that suppresses rules for the entire file.
pub const FILE_MARKER: &str = "check-this: disable=";

/// Marker that suppresses rules on its own line.
///
/// A check-this addition on top of [`FILE_MARKER`]; the file-wide marker
/// keeps its meaning when both appear.
pub const LINE_MARKER: &str = "check-this: disable-line=";

/// How a rule is suppressed within one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suppression {
    /// Suppressed only on the listed zero-based lines.
    PerLine(BTreeSet<usize>),
    /// Suppressed on every line. `marked_lines` records where markers were.
    FileWide {
        /// Zero-based lines that carried a marker for this rule.
        marked_lines: BTreeSet<usize>,
    },
}

impl Suppression {
    /// Returns true if a finding starting on `line` is suppressed.
    #[must_use]
    pub fn covers(&self, line: usize) -> bool {
        match self {
            Self::PerLine(lines) => lines.contains(&line),
            Self::FileWide { .. } => true,
        }
    }

    fn mark_line(&mut self, line: usize) {
        match self {
            Self::PerLine(lines) | Self::FileWide { marked_lines: lines } => {
                lines.insert(line);
            }
        }
    }

    fn widen(&mut self) {
        if let Self::PerLine(lines) = self {
            *self = Self::FileWide {
                marked_lines: std::mem::take(lines),
            };
        }
    }
}

/// Per-request index of suppressed rules, keyed by rule id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuppressionIndex {
    rules: HashMap<String, Suppression>,
}

impl SuppressionIndex {
    /// Scans raw source text for suppression markers.
    ///
    /// Never fails: malformed markers contribute nothing.
    #[must_use]
    pub fn extract(source: &[u8]) -> Self {
        let text = String::from_utf8_lossy(source);
        let mut index = Self::default();

        for (line_no, line) in text.split('\n').enumerate() {
            if let Some(ids) = marker_payload(line, LINE_MARKER) {
                for id in parse_rule_ids(ids) {
                    index.entry(id, line_no);
                }
            }
            if let Some(ids) = marker_payload(line, FILE_MARKER) {
                for id in parse_rule_ids(ids) {
                    index.entry(id, line_no).widen();
                }
            }
        }

        index
    }

    fn entry(&mut self, rule_id: &str, line: usize) -> &mut Suppression {
        let suppression = self
            .rules
            .entry(rule_id.to_string())
            .or_insert_with(|| Suppression::PerLine(BTreeSet::new()));
        suppression.mark_line(line);
        suppression
    }

    /// Returns true if `rule_id` is suppressed for a finding starting on `line`.
    #[must_use]
    pub fn is_suppressed(&self, rule_id: &str, line: usize) -> bool {
        self.rules.get(rule_id).is_some_and(|s| s.covers(line))
    }

    /// The suppression recorded for `rule_id`, if any.
    #[must_use]
    pub fn get(&self, rule_id: &str) -> Option<&Suppression> {
        self.rules.get(rule_id)
    }

    /// Returns true if no markers were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Text following `marker` on `line`, if the marker is present.
fn marker_payload<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    line.find(marker).map(|idx| &line[idx + marker.len()..])
}

fn parse_rule_ids(payload: &str) -> impl Iterator<Item = &str> {
    payload.split(',').map(str::trim).filter(|id| !id.is_empty())
}
