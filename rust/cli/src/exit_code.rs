//! Process exit codes returned by [`crate::run`].

/// The command completed, including `--help` and `--version`.
pub const SUCCESS: i32 = 0;

/// Bad arguments, unreadable input, invalid configuration or a failed audit.
pub const ERROR: i32 = 2;
