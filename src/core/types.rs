//! Core type definitions shared by the executor, router and formatter

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// External command-line tools the router can dispatch to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    /// Orchestration tool for resource management
    Gcloud,
    /// Query tool for structured-data queries
    Bq,
}

impl Tool {
    /// Literal prefix a command string must start with to reach this tool
    pub fn prefix(self) -> &'static str {
        match self {
            Tool::Gcloud => "gcloud ",
            Tool::Bq => "bq ",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tool::Gcloud => "gcloud",
            Tool::Bq => "bq",
        }
    }
}

/// Outcome of running one argument vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExecutionResult {
    /// Exit code 0. `result` holds parsed JSON (object or array) or
    /// trimmed stdout as a string.
    Success { result: Value },
    /// Non-zero exit, launch failure or malformed command
    Error {
        error_message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        exit_code: Option<i32>,
    },
}

impl ExecutionResult {
    pub fn success(result: Value) -> Self {
        Self::Success { result }
    }

    pub fn error(message: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self::Error {
            error_message: message.into(),
            exit_code,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The parsed result on success
    pub fn result(&self) -> Option<&Value> {
        match self {
            Self::Success { result } => Some(result),
            Self::Error { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Error { error_message, .. } => Some(error_message),
        }
    }

    /// Exit code of a failed process; `None` on success or when the
    /// process never ran or was killed by a signal
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Success { .. } => None,
            Self::Error { exit_code, .. } => *exit_code,
        }
    }
}

/// Response handed back to the host for one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ToolResponse {
    Success {
        report: String,
    },
    Error {
        error_message: String,
        /// Rendered suggestion list, one command per line after a header
        suggested_commands: String,
    },
}

impl ToolResponse {
    pub fn success(report: impl Into<String>) -> Self {
        Self::Success {
            report: report.into(),
        }
    }

    pub fn error(message: impl Into<String>, suggested_commands: impl Into<String>) -> Self {
        Self::Error {
            error_message: message.into(),
            suggested_commands: suggested_commands.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Flatten into the `{status, message}` pair shown to the user
    pub fn into_message(self) -> AssistantReply {
        match self {
            Self::Success { report } => AssistantReply {
                status: ReplyStatus::Success,
                message: report,
            },
            Self::Error {
                error_message,
                suggested_commands,
            } => {
                let message = if suggested_commands.is_empty() {
                    error_message
                } else {
                    format!("{}\n\n{}", error_message, suggested_commands)
                };
                AssistantReply {
                    status: ReplyStatus::Error,
                    message,
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyStatus {
    Success,
    Error,
}

/// Final message for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantReply {
    pub status: ReplyStatus,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_execution_success_serialization() {
        let result = ExecutionResult::success(json!([{"name": "a"}]));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value, json!({"status": "success", "result": [{"name": "a"}]}));
    }

    #[test]
    fn test_execution_error_omits_missing_exit_code() {
        let result = ExecutionResult::error("boom", None);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value, json!({"status": "error", "error_message": "boom"}));

        let with_code = ExecutionResult::error("boom", Some(2));
        let value = serde_json::to_value(&with_code).unwrap();
        assert_eq!(value["exit_code"], json!(2));
    }

    #[test]
    fn test_exit_code_only_on_errors() {
        assert_eq!(ExecutionResult::success(json!([])).exit_code(), None);
        assert_eq!(ExecutionResult::error("boom", Some(3)).exit_code(), Some(3));
        assert_eq!(ExecutionResult::error("boom", None).exit_code(), None);
    }

    #[test]
    fn test_tool_response_deserialization() {
        let json = r#"{"status": "error", "error_message": "bad", "suggested_commands": "try\nbq ls"}"#;
        let response: ToolResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response, ToolResponse::error("bad", "try\nbq ls"));
    }

    #[test]
    fn test_into_message_joins_suggestions() {
        let reply = ToolResponse::error("Unknown query", "Try:\ngcloud projects list").into_message();
        assert_eq!(reply.status, ReplyStatus::Error);
        assert_eq!(reply.message, "Unknown query\n\nTry:\ngcloud projects list");

        let reply = ToolResponse::success("All good").into_message();
        assert_eq!(reply.status, ReplyStatus::Success);
        assert_eq!(reply.message, "All good");
    }

    #[test]
    fn test_tool_prefixes() {
        assert_eq!(Tool::Gcloud.prefix(), "gcloud ");
        assert_eq!(Tool::Bq.prefix(), "bq ");
    }
}
