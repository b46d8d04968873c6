//! # Exit Codes
//!
//! Standard exit codes for the supportroute CLI.
//!
//! Scripts can tell a bad question apart from a bad rule file without
//! parsing output.

/// Successful execution
pub const EXIT_SUCCESS: i32 = 0;

/// General error (unspecified)
pub const EXIT_ERROR: i32 = 1;

/// Configuration error (missing, unreadable or malformed rule set or config)
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Invalid input (empty query, bad arguments)
pub const EXIT_INVALID_INPUT: i32 = 6;
