//! Subcommand implementations.

pub mod analyze;
pub mod list_rules;
pub mod output;
