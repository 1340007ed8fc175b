//! Response formatting - turns execution results into user-facing reports

use crate::core::types::{ExecutionResult, ToolResponse};
use crate::report::suggest::suggested_commands;
use serde_json::Value;

/// Placeholder for fields missing from an item
pub const UNKNOWN: &str = "Unknown";

/// Renders one list item as a single line
pub type ItemFormatter = fn(&Value) -> String;

/// How a listing intent renders its items
#[derive(Clone)]
pub struct ListSpec {
    /// Heading line, e.g. "Available GCP projects"
    pub title: String,
    /// Replaces the default `No <title> found.` for empty results
    pub empty_text: Option<String>,
    pub item: ItemFormatter,
}

impl ListSpec {
    pub fn new(title: impl Into<String>, item: ItemFormatter) -> Self {
        Self {
            title: title.into(),
            empty_text: None,
            item,
        }
    }

    pub fn with_empty_text(mut self, text: impl Into<String>) -> Self {
        self.empty_text = Some(text.into());
        self
    }

    /// Render `items` under the title, one line each
    pub fn render(&self, items: &[Value]) -> String {
        if items.is_empty() {
            return match &self.empty_text {
                Some(text) => text.clone(),
                None => format!("No {} found.", self.title.to_lowercase()),
            };
        }
        let lines: Vec<String> = items.iter().map(|item| (self.item)(item)).collect();
        format!("{}:\n{}", self.title, lines.join("\n"))
    }
}

impl std::fmt::Debug for ListSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListSpec")
            .field("title", &self.title)
            .field("empty_text", &self.empty_text)
            .finish_non_exhaustive()
    }
}

/// How a successful execution is presented
#[derive(Debug, Clone)]
pub enum Presentation {
    /// List renderer for sequence results; anything else passes through
    Listing(ListSpec),
    /// Result as-is, structured values pretty-printed
    PassThrough,
    /// Heading line followed by the pass-through rendering
    Prefixed(String),
    /// Fixed confirmation text, result ignored
    Confirmation(String),
}

/// Build the tool response for an execution
///
/// `input` is the original query or command; failed executions get
/// suggestions derived from it.
pub fn format_execution(
    execution: &ExecutionResult,
    presentation: &Presentation,
    input: &str,
) -> ToolResponse {
    let result = match execution {
        ExecutionResult::Success { result } => result,
        ExecutionResult::Error { error_message, .. } => {
            return ToolResponse::error(
                format!("Error executing command: {}", error_message),
                suggested_commands(input),
            );
        }
    };

    let report = match presentation {
        Presentation::Listing(spec) => match result {
            Value::Array(items) => spec.render(items),
            other => render_value(other),
        },
        Presentation::PassThrough => render_value(result),
        Presentation::Prefixed(heading) => format!("{}\n{}", heading, render_value(result)),
        Presentation::Confirmation(text) => text.clone(),
    };
    ToolResponse::success(report)
}

/// Text stays as-is; structured values become indented JSON
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

/// String form of `item[key]`, or "Unknown" when missing
pub fn field(item: &Value, key: &str) -> String {
    field_or(item, key, UNKNOWN)
}

/// String form of `item[key]`, or `default` when missing or null
pub fn field_or(item: &Value, key: &str, default: &str) -> String {
    match item.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => default.to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn project_line(p: &Value) -> String {
        format!("- {} (ID: {})", field(p, "name"), field(p, "projectId"))
    }

    #[test]
    fn test_listing_renders_items() {
        let spec = ListSpec::new("Available GCP projects", project_line);
        let execution = ExecutionResult::success(json!([
            {"name": "Demo", "projectId": "demo-1"},
            {"projectId": "orphan"}
        ]));
        let response = format_execution(&execution, &Presentation::Listing(spec), "list projects");
        assert_eq!(
            response,
            ToolResponse::success(
                "Available GCP projects:\n- Demo (ID: demo-1)\n- Unknown (ID: orphan)"
            )
        );
    }

    #[test]
    fn test_empty_listing() {
        let spec = ListSpec::new("Available GCP projects", project_line);
        let execution = ExecutionResult::success(json!([]));
        let response = format_execution(&execution, &Presentation::Listing(spec), "list projects");
        assert_eq!(response, ToolResponse::success("No available gcp projects found."));
    }

    #[test]
    fn test_empty_listing_custom_text() {
        let spec = ListSpec::new("BigQuery datasets", project_line)
            .with_empty_text("No BigQuery datasets found.");
        assert_eq!(spec.render(&[]), "No BigQuery datasets found.");
    }

    #[test]
    fn test_listing_with_text_result_passes_through() {
        let spec = ListSpec::new("Available GCP projects", project_line);
        let execution = ExecutionResult::success(json!("Listed 0 items."));
        let response = format_execution(&execution, &Presentation::Listing(spec), "list projects");
        assert_eq!(response, ToolResponse::success("Listed 0 items."));
    }

    #[test]
    fn test_prefixed_pretty_prints() {
        let execution = ExecutionResult::success(json!({"projectId": "demo"}));
        let response = format_execution(
            &execution,
            &Presentation::Prefixed("Command executed successfully:".into()),
            "gcloud projects describe demo",
        );
        assert_eq!(
            response,
            ToolResponse::success("Command executed successfully:\n{\n  \"projectId\": \"demo\"\n}")
        );
    }

    #[test]
    fn test_confirmation_ignores_result() {
        let execution = ExecutionResult::success(json!({"billingEnabled": true}));
        let response = format_execution(
            &execution,
            &Presentation::Confirmation("Linked.".into()),
            "link billing",
        );
        assert_eq!(response, ToolResponse::success("Linked."));
    }

    #[test]
    fn test_error_gets_suggestions() {
        let execution = ExecutionResult::error("ERROR: (gcloud) permission denied", Some(1));
        let response = format_execution(&execution, &Presentation::PassThrough, "list zones");
        match response {
            ToolResponse::Error {
                error_message,
                suggested_commands,
            } => {
                assert_eq!(
                    error_message,
                    "Error executing command: ERROR: (gcloud) permission denied"
                );
                assert!(suggested_commands.ends_with("gcloud compute zones list"));
            }
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_field_defaults() {
        let item = json!({"open": true, "note": null, "name": "x"});
        assert_eq!(field(&item, "name"), "x");
        assert_eq!(field(&item, "missing"), "Unknown");
        assert_eq!(field(&item, "note"), "Unknown");
        assert_eq!(field_or(&item, "open", "false"), "true");
        assert_eq!(field_or(&json!({}), "open", "false"), "false");
    }
}
