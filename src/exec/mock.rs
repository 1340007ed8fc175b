//! Recording runner for tests.
//!
//! Records every argument vector it receives and replays pre-queued
//! results, so routing and classification can be exercised without
//! `gcloud` or `bq` installed.

use std::cell::RefCell;

use crate::core::types::ExecutionResult;
use crate::exec::CommandRunner;

/// Test-double runner that records calls and returns preset results.
pub struct RecordingRunner {
    responses: RefCell<Vec<ExecutionResult>>,
    calls: RefCell<Vec<Vec<String>>>,
}

impl RecordingRunner {
    /// Runner that answers every call with `success("")`
    pub fn new() -> Self {
        RecordingRunner {
            responses: RefCell::new(Vec::new()),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Runner that answers calls with `responses` in order
    pub fn with_responses(responses: Vec<ExecutionResult>) -> Self {
        let mut reversed = responses;
        reversed.reverse();
        RecordingRunner {
            responses: RefCell::new(reversed),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Queue one more result
    pub fn push_response(&self, response: ExecutionResult) {
        self.responses.borrow_mut().insert(0, response);
    }

    /// All argument vectors executed so far, in order
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }

    pub fn last_call(&self) -> Option<Vec<String>> {
        self.calls.borrow().last().cloned()
    }
}

impl Default for RecordingRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for RecordingRunner {
    fn execute(&self, argv: &[String]) -> ExecutionResult {
        self.calls.borrow_mut().push(argv.to_vec());
        self.responses
            .borrow_mut()
            .pop()
            .unwrap_or_else(|| ExecutionResult::success(serde_json::Value::String(String::new())))
    }
}

/// Run `f` with a debug-level subscriber and return everything it logged
#[cfg(test)]
pub(crate) fn capture_logs(f: impl FnOnce()) -> String {
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuf {
        fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(bytes);
            Ok(bytes.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let buf = SharedBuf(Arc::new(Mutex::new(Vec::new())));
    let writer = buf.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);

    let bytes = buf.0.lock().unwrap().clone();
    String::from_utf8_lossy(&bytes).into_owned()
}
