//! List rules command implementation.

use check_this_core::Rule;
use check_this_rules::all_rules;
use std::io::{self, Write};

/// Runs the list-rules command.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn run() -> io::Result<()> {
    let stdout = io::stdout();
    write_table(&mut stdout.lock())
}

fn write_table(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "Available rules:\n")?;
    writeln!(
        out,
        "{:<22} {:<9} {:<24} Description",
        "Id", "Default", "Tags"
    )?;
    writeln!(out, "{}", "-".repeat(90))?;

    for rule in all_rules() {
        writeln!(out, "{}", row(rule.as_ref()))?;
    }

    writeln!(out, "\nSuppress inline with a comment such as:")?;
    writeln!(out, "  # check-this: disable=errors.swallowed,net.no_timeout")?;
    writeln!(out, "  // check-this: disable-line=retry.unbounded")?;
    Ok(())
}

fn row(rule: &dyn Rule) -> String {
    let meta = rule.meta();
    format!(
        "{:<22} {:<9} {:<24} {}",
        rule.id(),
        meta.default_severity.to_string(),
        meta.tags.join(","),
        meta.short
    )
}
