//! Process execution
//!
//! `CommandRunner` is the seam between command building and the OS:
//! `SubprocessExecutor` spawns real processes, `RecordingRunner` records
//! argument vectors and replays queued results for tests.

pub mod mock;
pub mod subprocess;

pub use mock::RecordingRunner;
pub use subprocess::SubprocessExecutor;

use crate::core::types::ExecutionResult;

/// Runs a fully built argument vector
///
/// `argv[0]` is the program; the rest are passed verbatim, never through
/// a shell. Implementations convert every failure into
/// `ExecutionResult::Error`.
pub trait CommandRunner {
    fn execute(&self, argv: &[String]) -> ExecutionResult;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn execute(&self, argv: &[String]) -> ExecutionResult {
        (**self).execute(argv)
    }
}
