//! Process exit statuses, numbered after BSD sysexits.h.
//!
//! `CliError::exit_code` picks one per failure class.

/// Command finished, including `check` on valid records.
pub const OK: i32 = 0;

/// No subcommand given.
pub const USAGE: i32 = 64;

/// Input is not JSON, or `check` found broken parent links, duplicate keys
/// or cycles.
pub const DATAERR: i32 = 65;

/// Record source file (or stdin) could not be read.
pub const NOINPUT: i32 = 66;

/// Rendered output could not be serialized.
pub const SOFTWARE: i32 = 70;

/// Config file missing, unparsable, or a `TREELIST_*` value is unusable.
pub const CONFIG: i32 = 78;
