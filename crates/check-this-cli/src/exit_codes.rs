//! Process exit codes for the `check-this` binary.
//!
//! Findings never change the exit code: callers read severities from the
//! envelope.

/// Analysis ran and the envelope was printed.
pub const EXIT_SUCCESS: i32 = 0;

/// Bad arguments, unsupported language, or unusable config. Nothing printed
/// on stdout.
pub const EXIT_INVALID_INPUT: i32 = 2;

/// I/O or serialization failure inside the tool.
pub const EXIT_INTERNAL_ERROR: i32 = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        assert_ne!(EXIT_SUCCESS, EXIT_INVALID_INPUT);
        assert_ne!(EXIT_SUCCESS, EXIT_INTERNAL_ERROR);
        assert_ne!(EXIT_INVALID_INPUT, EXIT_INTERNAL_ERROR);
    }

    #[test]
    fn invalid_input_matches_clap_usage_code() {
        // clap exits with 2 on argument errors; keep validation failures aligned.
        assert_eq!(EXIT_INVALID_INPUT, 2);
    }
}
