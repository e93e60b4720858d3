//! # check-this-core
//!
//! Core framework for reliability linting over tree-sitter syntax trees.
//!
//! This crate provides the foundational traits and types for building
//! check-this rules. It includes:
//!
//! - [`Rule`] trait for per-file detectors
//! - [`Engine`] for orchestrating parsing, rule execution, and suppressions
//! - [`Diagnostic`] and [`Output`] for representing findings
//! - [`SuppressionIndex`] for inline `check-this: disable=` markers
//! - [`Config`] for per-rule enablement and severity overrides
//!
//! ## Example
//!
//! ```ignore
//! use check_this_core::{AnalyzeRequest, Engine};
//!
//! let engine = Engine::builder()
//!     .rule(MyRule)
//!     .build();
//!
//! let request = AnalyzeRequest::new("python", source).validate()?;
//! let output = engine.analyze(&request);
//! println!("{}", serde_json::to_string_pretty(&output)?);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod context;
mod engine;
mod language;
mod rule;
mod suppression;
mod types;

/// Utility modules for rule implementations.
pub mod utils;

pub use config::{Config, ConfigError, RuleConfig};
pub use context::{node_range, RuleContext};
pub use engine::{
    AnalyzeRequest, Engine, EngineBuilder, ValidatedRequest, ValidationError, DEFAULT_VERSION,
    PARSE_ERROR_ID,
};
pub use language::{Language, ParseError, TreeProducer, TreeSitterProducer, UnsupportedLanguage};
pub use rule::{Rule, RuleBox, RuleError, RuleMeta};
pub use suppression::{Suppression, SuppressionIndex, FILE_MARKER, LINE_MARKER};
pub use types::{Diagnostic, Output, Position, Range, Severity, Stats};
