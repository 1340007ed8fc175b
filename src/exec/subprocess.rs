//! Subprocess executor - runs an argument vector and normalises its output

use crate::core::error::AssistantError;
use crate::core::types::ExecutionResult;
use crate::exec::CommandRunner;
use serde_json::Value;
use std::process::{Command, Output};

/// Production runner backed by `std::process::Command`
///
/// Blocks until the child exits. No timeout is applied.
#[derive(Debug, Clone, Default)]
pub struct SubprocessExecutor {
    debug: bool,
}

impl SubprocessExecutor {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }
}

impl CommandRunner for SubprocessExecutor {
    fn execute(&self, argv: &[String]) -> ExecutionResult {
        if self.debug {
            tracing::debug!("Executing command: {}", argv.join(" "));
        }

        let Some((program, args)) = argv.split_first() else {
            return ExecutionResult::error("No command to execute", None);
        };

        if program.is_empty() {
            let err = AssistantError::Launch {
                program: program.clone(),
                reason: "executable path is not configured".into(),
            };
            return ExecutionResult::error(err.to_string(), None);
        }

        let output = match Command::new(program).args(args).output() {
            Ok(output) => output,
            Err(e) => {
                let err = AssistantError::Launch {
                    program: program.clone(),
                    reason: e.to_string(),
                };
                tracing::warn!("{}", err);
                return ExecutionResult::error(err.to_string(), None);
            }
        };

        if self.debug {
            tracing::debug!("Command stdout: {}", String::from_utf8_lossy(&output.stdout));
            tracing::debug!("Command stderr: {}", String::from_utf8_lossy(&output.stderr));
        }

        let result = interpret_output(argv, &output);
        if self.debug {
            if let Some(message) = result.error_message() {
                tracing::debug!("Command failed: {}", message);
            }
        }
        result
    }
}

/// Convert captured process output into an execution result
fn interpret_output(argv: &[String], output: &Output) -> ExecutionResult {
    if output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        return ExecutionResult::success(parse_stdout(&stdout));
    }

    let code = output.status.code();
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    let message = if stderr.is_empty() {
        match code {
            Some(code) => format!(
                "Command '{}' returned non-zero exit status {}.",
                argv.join(" "),
                code
            ),
            None => format!("Command '{}' was terminated by a signal.", argv.join(" ")),
        }
    } else {
        stderr.to_string()
    };

    ExecutionResult::error(message, code)
}

/// Parse stdout as a JSON object or array, falling back to trimmed text
pub fn parse_stdout(stdout: &str) -> Value {
    match serde_json::from_str::<Value>(stdout) {
        Ok(value @ (Value::Array(_) | Value::Object(_))) => value,
        _ => Value::String(stdout.trim().to_string()),
    }
}
