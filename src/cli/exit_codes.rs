//! exit codes for thingif commands
//!
//! these follow Unix conventions where 0 = success and non-zero = error
//! specific codes help scripts distinguish between failure types

/// command completed successfully
pub const SUCCESS: i32 = 0;

/// general or unknown error (unreadable file, I/O)
pub const ERROR: i32 = 1;

/// input JSON is not a valid clause, predicate or trigger
pub const MALFORMED_INPUT: i32 = 2;

/// predicate or request not accepted by the configured API surface
pub const UNSUPPORTED: i32 = 3;

/// invalid command-line arguments
pub const INVALID_ARGS: i32 = 4;

/// configuration file error
pub const CONFIG_ERROR: i32 = 5;

/// `eval --exit-code` and the clause did not match
pub const CONDITION_FALSE: i32 = 6;
