//! Command routing pipeline
//!
//! Converts literal CLI strings into argument vectors:
//! command string -> Dialect -> tokenizer / SQL splitter -> argv -> CommandRunner

pub mod args;
pub mod router;
pub mod sql;

pub use args::{count_format_flags, ensure_format_flag, tokenize, DEFAULT_FORMAT_FLAG};
pub use router::{is_literal_command, CommandRouter, Dialect, ToolPaths};
pub use sql::{split_query_flags, SqlParts, TableRefQuoter};
