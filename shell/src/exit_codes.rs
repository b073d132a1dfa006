//! Stable exit codes for the shell binaries.

/// Command succeeded or every check passed.
pub const OK: i32 = 0;
/// A check failed or the command hit an unexpected error.
pub const FAILED: i32 = 1;
/// The command was given input that failed validation (unknown theme, scope, ...).
pub const INVALID: i32 = 2;
