//! Shared output formatting for analysis results.

use anyhow::Result;
use check_this_core::{Diagnostic, Output, Severity};
use miette::{GraphicalReportHandler, GraphicalTheme, LabeledSpan, NamedSource, SourceSpan};
use std::borrow::Cow;
use std::fmt::{self, Display};
use std::io::{IsTerminal, Write};

use crate::OutputFormat;

const STDIN_NAME: &str = "<stdin>";

/// Writes `output` in the requested format. `source` is the analyzed input,
/// used for snippets in the text format.
pub fn write(out: &mut dyn Write, output: &Output, source: &[u8], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(out, output),
        OutputFormat::Text => write_text(out, output, source),
        OutputFormat::Compact => write_compact(out, output),
    }
}

fn write_json(out: &mut dyn Write, output: &Output) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, output)?;
    writeln!(out)?;
    Ok(())
}

fn write_text(out: &mut dyn Write, output: &Output, source: &[u8]) -> Result<()> {
    let name = output.path.as_deref().unwrap_or(STDIN_NAME);
    let text = snippet_text(source);
    let named = NamedSource::new(name, text.to_string());
    let theme = if std::io::stdout().is_terminal() {
        GraphicalTheme::unicode()
    } else {
        GraphicalTheme::unicode_nocolor()
    };
    let handler = GraphicalReportHandler::new_themed(theme);

    for diagnostic in &output.diagnostics {
        let report = Report::new(diagnostic, &named, &text);
        let mut rendered = String::new();
        handler.render_report(&mut rendered, &report)?;
        writeln!(out, "{rendered}")?;
    }

    let (errors, warnings, infos) = output.count_by_severity();
    writeln!(
        out,
        "Found {errors} error(s), {warnings} warning(s), {infos} info(s) in {name} ({} rules, {}ms)",
        output.stats.rules_run,
        output.stats.parse_ms + output.stats.analyze_ms,
    )?;
    Ok(())
}

/// Decodes `source` for display, one `?` per invalid byte.
///
/// Diagnostic columns are byte offsets into the raw input, so every byte
/// must keep its position in the decoded text.
fn snippet_text(source: &[u8]) -> Cow<'_, str> {
    let mut rest = match std::str::from_utf8(source) {
        Ok(text) => return Cow::Borrowed(text),
        Err(_) => source,
    };
    let mut text = String::with_capacity(source.len());
    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                text.push_str(valid);
                return Cow::Owned(text);
            }
            Err(err) => {
                let (valid, after) = rest.split_at(err.valid_up_to());
                text.push_str(std::str::from_utf8(valid).unwrap_or_default());
                let bad = err.error_len().unwrap_or(after.len());
                text.push_str(&"?".repeat(bad));
                rest = &after[bad..];
            }
        }
    }
}

fn write_compact(out: &mut dyn Write, output: &Output) -> Result<()> {
    let name = output.path.as_deref().unwrap_or(STDIN_NAME);
    for diagnostic in &output.diagnostics {
        writeln!(out, "{name}:{diagnostic}")?;
    }
    Ok(())
}

/// One diagnostic bound to its source, for miette rendering.
#[derive(Debug)]
struct Report<'a> {
    diagnostic: &'a Diagnostic,
    source: &'a NamedSource<String>,
    span: SourceSpan,
}

impl<'a> Report<'a> {
    fn new(diagnostic: &'a Diagnostic, source: &'a NamedSource<String>, text: &str) -> Self {
        let (offset, len) = diagnostic.range.byte_span(text);
        Self {
            diagnostic,
            source,
            span: SourceSpan::from((offset, len)),
        }
    }
}

impl Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.diagnostic.message)
    }
}

impl std::error::Error for Report<'_> {}

impl miette::Diagnostic for Report<'_> {
    fn code<'b>(&'b self) -> Option<Box<dyn Display + 'b>> {
        Some(Box::new(&self.diagnostic.rule_id))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.diagnostic.severity {
            Some(Severity::Error) => miette::Severity::Error,
            Some(Severity::Info) => miette::Severity::Advice,
            Some(Severity::Warning) | None => miette::Severity::Warning,
        })
    }

    fn help<'b>(&'b self) -> Option<Box<dyn Display + 'b>> {
        self.diagnostic
            .explanation
            .as_ref()
            .map(|e| Box::new(e) as Box<dyn Display + 'b>)
    }

    fn url<'b>(&'b self) -> Option<Box<dyn Display + 'b>> {
        self.diagnostic
            .docs_url
            .as_ref()
            .map(|u| Box::new(u) as Box<dyn Display + 'b>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(self.source)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = if self.diagnostic.tags.is_empty() {
            None
        } else {
            Some(self.diagnostic.tags.join(", "))
        };
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            label, self.span,
        ))))
    }
}
