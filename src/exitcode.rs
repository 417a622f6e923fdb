//! Process exit codes
//!
//! polycli does not differentiate failures: parse errors, configuration
//! errors and command failures all exit with `FAILURE`.

/// Successful termination
pub const OK: i32 = 0;

/// Any usage, configuration or command failure
pub const FAILURE: i32 = 1;
