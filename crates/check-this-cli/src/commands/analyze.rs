//! Analyze command implementation.

use anyhow::Context;
use check_this_core::{AnalyzeRequest, Language};
use check_this_rules::default_engine;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::config_resolver;
use crate::exit_codes::{EXIT_INTERNAL_ERROR, EXIT_INVALID_INPUT};
use crate::OutputFormat;

/// Arguments for `check-this analyze`.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeArgs {
    /// Path reported in the envelope; also drives language detection.
    pub path: Option<PathBuf>,
    /// Explicit language identifier.
    pub lang: Option<String>,
    /// Output format.
    pub format: OutputFormat,
    /// Explicit configuration file.
    pub config: Option<PathBuf>,
}

/// Failure of the analyze command, split by exit code.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    /// The request or its configuration was rejected.
    #[error("{0:#}")]
    Invalid(anyhow::Error),
    /// Reading input or writing output failed.
    #[error("{0:#}")]
    Internal(anyhow::Error),
}

impl AnalyzeError {
    /// Process exit code for this failure.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Invalid(_) => EXIT_INVALID_INPUT,
            Self::Internal(_) => EXIT_INTERNAL_ERROR,
        }
    }
}

/// Runs the analyze command against stdin and stdout.
///
/// # Errors
///
/// See [`AnalyzeError`].
pub fn run(args: &AnalyzeArgs) -> Result<(), AnalyzeError> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_with(args, &mut stdin.lock(), &mut stdout.lock())
}

/// Reads source from `input`, analyzes it, and writes the report to `out`.
///
/// Nothing is written to `out` unless analysis actually ran.
///
/// # Errors
///
/// See [`AnalyzeError`].
pub fn run_with(
    args: &AnalyzeArgs,
    input: &mut dyn Read,
    out: &mut dyn Write,
) -> Result<(), AnalyzeError> {
    let mut source = Vec::new();
    input
        .read_to_end(&mut source)
        .context("Failed to read source from stdin")
        .map_err(AnalyzeError::Internal)?;

    let project_dir = args
        .path
        .as_deref()
        .and_then(Path::parent)
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let loaded = config_resolver::load(project_dir, args.config.as_deref())
        .context("Failed to load config")
        .map_err(AnalyzeError::Invalid)?;
    for layer in &loaded.sources {
        tracing::debug!("Applied config layer: {}", layer.display());
    }

    let request = AnalyzeRequest {
        path: args.path.as_ref().map(|p| p.display().to_string()),
        language: Language::detect(args.lang.as_deref(), args.path.as_deref()),
        source,
        config: loaded.config,
        version: None,
    };
    let validated = request
        .validate()
        .context("Invalid request")
        .map_err(AnalyzeError::Invalid)?;

    let engine = default_engine();
    tracing::info!(
        "Analyzing {} as {} with {} rules",
        validated.request().path.as_deref().unwrap_or("<stdin>"),
        validated.language(),
        engine.rules().len()
    );
    let output = engine.analyze(&validated);

    super::output::write(out, &output, &validated.request().source, args.format)
        .context("Failed to write report")
        .map_err(AnalyzeError::Internal)
}
